//! Validation orchestrator
//!
//! Turns a document (URI plus text) into a replace-all set of diagnostics:
//! resolve the schema for the document's file name, borrow its compiled
//! validator, run it, and map every failure to a [`Diagnostic`].

pub mod diagnostic;

pub use diagnostic::{DIAGNOSTIC_SOURCE, Diagnostic, Position, Range, Severity};

use crate::compiler::CompilerPool;
use crate::config::ValidationSettings;
use crate::error::LintError;
use crate::registry::SchemaRegistry;
use percent_encoding::percent_decode_str;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, error, warn};
use url::Url;

/// Result of validating one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Replace the document's diagnostics with these (possibly none)
    Publish(Vec<Diagnostic>),
    /// Leave whatever was published before untouched
    Unchanged,
}

/// Owns the registry and compiler pool for the life of the process
pub struct Orchestrator<'src> {
    registry: SchemaRegistry<'src>,
    pool: CompilerPool,
}

impl<'src> Orchestrator<'src> {
    #[must_use]
    pub const fn new(registry: SchemaRegistry<'src>, pool: CompilerPool) -> Self {
        Self { registry, pool }
    }

    #[must_use]
    pub const fn registry(&self) -> &SchemaRegistry<'src> {
        &self.registry
    }

    #[must_use]
    pub const fn pool(&self) -> &CompilerPool {
        &self.pool
    }

    /// Validate a document, absorbing errors into the outcome
    ///
    /// Unmapped documents and schema load/compile failures leave diagnostics
    /// unchanged; a document that does not parse has its diagnostics cleared.
    pub fn validate(
        &mut self,
        document_uri: &str,
        text: &str,
        settings: &ValidationSettings,
    ) -> ValidationOutcome {
        match self.try_validate(document_uri, text, settings) {
            Ok(Some(diagnostics)) => ValidationOutcome::Publish(diagnostics),
            Ok(None) => ValidationOutcome::Unchanged,
            Err(err @ LintError::DocumentParse { .. }) => {
                warn!("{document_uri}: {err}");
                ValidationOutcome::Publish(Vec::new())
            }
            Err(err) => {
                error!("Skipping validation of {document_uri}: {err}");
                ValidationOutcome::Unchanged
            }
        }
    }

    /// Validate a document, surfacing every failure as a [`LintError`]
    ///
    /// Returns `Ok(None)` when no schema is mapped to the document's name.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::SchemaLoad`] or [`LintError::SchemaCompile`] when
    /// the schema is unusable and [`LintError::DocumentParse`] when `text` is
    /// not JSON5.
    pub fn try_validate(
        &mut self,
        document_uri: &str,
        text: &str,
        settings: &ValidationSettings,
    ) -> Result<Option<Vec<Diagnostic>>, LintError> {
        let file_name = document_file_name(document_uri);
        let Some(schema) = self.registry.resolve(&file_name, settings, &mut self.pool)? else {
            return Ok(None);
        };

        let validator = self.pool.get_validator(&schema)?;

        let instance: Value = json5::from_str(text).map_err(|e| {
            LintError::document_parse(format!("Failed to parse {file_name}: {e}"))
        })?;

        let range = Range::whole_document(text);
        let diagnostics: Vec<Diagnostic> = validator
            .iter_errors(&instance)
            .map(|e| Diagnostic::warning(document_uri, range, format!("{} {e}", e.instance_path)))
            .collect();

        debug!(
            "{file_name}: {} problem(s) against {}",
            diagnostics.len(),
            schema.id
        );
        Ok(Some(diagnostics))
    }
}

/// Lower-cased, percent-decoded basename of a document URI or plain path
#[must_use]
pub fn document_file_name(document_uri: &str) -> String {
    let name = match Url::parse(document_uri) {
        // Single-letter schemes are Windows drive letters, not URIs
        Ok(url) if url.scheme().len() > 1 => {
            if url.scheme() == "file"
                && let Ok(path) = url.to_file_path()
            {
                path_file_name(&path)
            } else {
                url.path_segments()
                    .and_then(|mut segments| segments.next_back())
                    .map(percent_decode)
                    .unwrap_or_default()
            }
        }
        _ => basename(document_uri).to_owned(),
    };
    name.to_lowercase()
}

fn path_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn percent_decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// File names a document refers to in its string values
///
/// A string contributes its lower-cased basename, without any `#fragment`,
/// when that basename has an extension. Unparsable documents refer to nothing.
#[must_use]
pub fn referenced_names(text: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    if let Ok(document) = json5::from_str::<Value>(text) {
        collect_names(&document, &mut names);
    }
    names
}

fn collect_names(value: &Value, names: &mut BTreeSet<String>) {
    match value {
        Value::String(text) => {
            let without_fragment = text.split('#').next().unwrap_or_default();
            let name = basename(without_fragment);
            if !name.is_empty()
                && !name.contains(char::is_whitespace)
                && name.trim_start_matches('.').contains('.')
            {
                names.insert(name.to_lowercase());
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_names(item, names)),
        Value::Object(entries) => entries.values().for_each(|item| collect_names(item, names)),
        _ => {}
    }
}
