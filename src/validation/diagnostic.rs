//! Diagnostics published for validated documents

use serde::Serialize;
use std::fmt;

/// Label attached to every diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "JSON Schema Validation";

/// Zero-based line and UTF-16 character offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Range covering all of `text`
    #[must_use]
    pub fn whole_document(text: &str) -> Self {
        let mut line: u32 = 0;
        let mut character: u32 = 0;
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    line += 1;
                    character = 0;
                }
                '\n' => {
                    line += 1;
                    character = 0;
                }
                _ => character += c.len_utf16() as u32,
            }
        }

        Self {
            start: Position {
                line: 0,
                character: 0,
            },
            end: Position { line, character },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// One validation failure in one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub document_uri: String,
    pub range: Range,
    pub message: String,
    pub severity: Severity,
    pub source: &'static str,
}

impl Diagnostic {
    #[must_use]
    pub fn warning(document_uri: &str, range: Range, message: String) -> Self {
        Self {
            document_uri: document_uri.to_owned(),
            range,
            message,
            severity: Severity::Warning,
            source: DIAGNOSTIC_SOURCE,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message.trim_start())
    }
}
