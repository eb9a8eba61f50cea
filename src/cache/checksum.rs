//! Content checksums for cache change detection

use sha2::{Digest as _, Sha256};
use std::fmt;

/// SHA-256 digest of schema text, hex encoded
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    #[must_use]
    pub fn of_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{hash:x}"))
    }

    /// Compute checksum from a string
    #[must_use]
    pub fn of_str(content: &str) -> Self {
        Self::of_bytes(content.as_bytes())
    }

    /// Get the hex string representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_content_same_checksum() {
        let content = r#"{"$schema": "http://json-schema.org/draft-04/schema#"}"#;
        assert_eq!(Checksum::of_str(content), Checksum::of_str(content));
    }

    #[test]
    fn whitespace_is_significant() {
        let compact = r#"{"a":1}"#;
        let spaced = r#"{ "a": 1 }"#;
        assert_ne!(Checksum::of_str(compact), Checksum::of_str(spaced));
    }

    #[test]
    fn hex_is_sha256_length() {
        let checksum = Checksum::of_str("schema");
        assert_eq!(checksum.as_str().len(), 64);
        assert_eq!(checksum, Checksum::of_bytes(b"schema"));
        assert_ne!(checksum, Checksum::of_str("schema "));
    }
}
