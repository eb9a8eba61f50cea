//! Document name to schema mapping

use crate::registry::Dialect;
use std::path::Path;

/// Location of the upstream connector schemas
pub const REMOTE_SCHEMA_BASE: &str =
    "https://raw.githubusercontent.com/microsoft/PowerPlatformConnectors/dev/schemas/";

/// Where the schema for one kind of connector document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIdentity {
    /// Lower-cased document file name, e.g. `apiproperties.json`
    pub document_name: String,
    pub remote_url: String,
    /// Path of the bundled copy, relative to the bundle root
    pub local_path: String,
    pub extended_local_path: Option<String>,
    /// Expected dialect; advisory only, `$schema` decides
    pub dialect_hint: Dialect,
}

impl SchemaIdentity {
    /// Create an identity for a document name
    #[must_use]
    pub fn new(
        document_name: &str,
        remote_url: &str,
        local_path: &str,
        dialect_hint: Dialect,
    ) -> Self {
        Self {
            document_name: document_name.to_lowercase(),
            remote_url: remote_url.to_owned(),
            local_path: local_path.to_owned(),
            extended_local_path: None,
            dialect_hint,
        }
    }

    /// Attach an extended schema path (builder pattern)
    #[must_use]
    pub fn with_extended(mut self, extended_local_path: &str) -> Self {
        self.extended_local_path = Some(extended_local_path.to_owned());
        self
    }

    /// Name of the cache file for the base schema
    #[must_use]
    pub fn cache_name(&self) -> &str {
        file_name_of(&self.local_path)
    }
}

/// Basename of a slash-separated path
#[must_use]
pub fn file_name_of(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

/// The authoritative set of linted document names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityTable {
    entries: Vec<SchemaIdentity>,
}

impl IdentityTable {
    /// Build a table from explicit entries
    #[must_use]
    pub fn new(entries: Vec<SchemaIdentity>) -> Self {
        Self { entries }
    }

    /// The Power Platform connector documents
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_remote_base(REMOTE_SCHEMA_BASE)
    }

    /// The built-in documents, fetched from a mirror of the upstream schemas
    #[must_use]
    pub fn from_remote_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        let remote = |file: &str| format!("{base}/{file}");
        Self::new(vec![
            SchemaIdentity::new(
                "settings.json",
                &remote("paconn-settings.schema.json"),
                "schemas/paconn-settings.schema.json",
                Dialect::Modern,
            ),
            SchemaIdentity::new(
                "apiProperties.json",
                &remote("paconn-apiProperties.schema.json"),
                "schemas/paconn-apiProperties.schema.json",
                Dialect::Modern,
            )
            .with_extended("schemas/paconn-apiProperties.extended.schema.json"),
            SchemaIdentity::new(
                "apiDefinition.swagger.json",
                &remote("apiDefinition.swagger.schema.json"),
                "schemas/apiDefinition.swagger.schema.json",
                Dialect::Legacy,
            )
            .with_extended("schemas/apiDefinition.swagger.extended.schema.json"),
        ])
    }

    /// Case-insensitive lookup by document file name
    #[must_use]
    pub fn lookup(&self, file_name: &str) -> Option<&SchemaIdentity> {
        let wanted = file_name.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.document_name == wanted)
    }

    /// All entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &SchemaIdentity> {
        self.entries.iter()
    }
}

impl Default for IdentityTable {
    fn default() -> Self {
        Self::builtin()
    }
}
