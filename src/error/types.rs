//! Custom error types with exit codes

use thiserror::Error;

/// Main error type for connector-lint operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LintError {
    /// Fetch Error - remote schema could not be downloaded
    #[error("Fetch error: {message}")]
    Fetch { message: String },

    /// Schema Load Error - missing mapping, unreadable or unparsable schema
    #[error("Schema load error: {message}")]
    SchemaLoad { message: String },

    /// Schema Compile Error - schema rejected by its metaschema or a keyword
    #[error("Schema compile error: {message}")]
    SchemaCompile { message: String },

    /// Document Parse Error - document text is not valid JSON5
    #[error("Document parse error: {message}")]
    DocumentParse { message: String },

    /// Configuration Error - missing or invalid settings
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Filesystem Error - file operation failed
    #[error("Filesystem error: {message}")]
    Filesystem { message: String },

    /// Findings - validation reported problems and warnings were denied
    #[error("{count} problem(s) found")]
    Findings { count: usize },
}

impl LintError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Configuration { .. } => 1,
            Self::Fetch { .. } => 2,
            Self::SchemaLoad { .. } => 3,
            Self::SchemaCompile { .. } => 4,
            Self::DocumentParse { .. } | Self::Filesystem { .. } => 5,
            Self::Findings { .. } => 6,
        }
    }

    /// Create a fetch error
    #[inline]
    pub fn fetch<S: Into<String>>(message: S) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create a schema load error
    #[inline]
    pub fn schema_load<S: Into<String>>(message: S) -> Self {
        Self::SchemaLoad {
            message: message.into(),
        }
    }

    /// Create a schema compile error
    #[inline]
    pub fn schema_compile<S: Into<String>>(message: S) -> Self {
        Self::SchemaCompile {
            message: message.into(),
        }
    }

    /// Create a document parse error
    #[inline]
    pub fn document_parse<S: Into<String>>(message: S) -> Self {
        Self::DocumentParse {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a filesystem error
    #[inline]
    pub fn filesystem<S: Into<String>>(message: S) -> Self {
        Self::Filesystem {
            message: message.into(),
        }
    }
}
