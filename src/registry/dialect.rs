//! JSON Schema dialect classification

use jsonschema::Draft;
use std::fmt;

/// Marker in `$schema` identifying the legacy dialect
pub const LEGACY_DRAFT_MARKER: &str = "draft-04";

/// The two schema families the linter compiles separately
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// draft-04 era schemas
    Legacy,
    /// draft-06 and later
    Modern,
}

impl Dialect {
    /// Classify a `$schema` URI
    #[must_use]
    pub fn classify(schema_uri: &str) -> Self {
        if schema_uri.contains(LEGACY_DRAFT_MARKER) {
            Self::Legacy
        } else {
            Self::Modern
        }
    }

    /// Draft the compiler should use for a schema declaring `schema_uri`
    #[must_use]
    pub fn draft_for(self, schema_uri: &str) -> Draft {
        match self {
            Self::Legacy => Draft::Draft4,
            Self::Modern if schema_uri.contains("draft-06") => Draft::Draft6,
            Self::Modern if schema_uri.contains("draft-07") => Draft::Draft7,
            Self::Modern if schema_uri.contains("2019-09") => Draft::Draft201909,
            Self::Modern => Draft::Draft202012,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Modern => "modern",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_04_marker_is_legacy() {
        assert_eq!(
            Dialect::classify("http://json-schema.org/draft-04/schema#"),
            Dialect::Legacy
        );
        assert_eq!(
            Dialect::classify("http://json-schema.org/draft-07/schema#"),
            Dialect::Modern
        );
        assert_eq!(
            Dialect::classify("https://json-schema.org/draft/2020-12/schema"),
            Dialect::Modern
        );
    }

    #[test]
    fn modern_draft_follows_marker() {
        let modern = Dialect::Modern;
        assert_eq!(
            modern.draft_for("http://json-schema.org/draft-07/schema#"),
            Draft::Draft7
        );
        assert_eq!(
            modern.draft_for("https://json-schema.org/draft/2019-09/schema"),
            Draft::Draft201909
        );
        assert_eq!(modern.draft_for("urn:unknown"), Draft::Draft202012);
        assert_eq!(
            Dialect::Legacy.draft_for("http://json-schema.org/draft-04/schema#"),
            Draft::Draft4
        );
    }
}
