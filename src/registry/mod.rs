//! Schema registry
//!
//! Resolves a document file name to the schema it must satisfy: looks the
//! name up in the identity table, loads the schema text (cache first, then
//! the bundled copy), normalizes its identity, classifies its dialect and, when
//! extended validation is on, returns the stricter extended schema in place of
//! the base one. Every loaded schema is registered with the compiler pool.

pub mod bundle;
pub mod dialect;

pub use bundle::SchemaBundle;
pub use dialect::{Dialect, LEGACY_DRAFT_MARKER};

use crate::cache::CacheStore;
use crate::compiler::CompilerPool;
use crate::config::identity::file_name_of;
use crate::config::{IdentityTable, ValidationSettings};
use crate::error::LintError;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where a loaded schema's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOrigin {
    Cache,
    Bundle,
}

impl fmt::Display for SchemaOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache => f.write_str("cache"),
            Self::Bundle => f.write_str("bundle"),
        }
    }
}

/// A parsed schema ready for compilation
#[derive(Debug, Clone)]
pub struct LoadedSchema {
    /// Normalized `$id`
    pub id: String,
    pub dialect: Dialect,
    pub document: Arc<Value>,
    pub local_path: String,
    pub origin: SchemaOrigin,
}

impl LoadedSchema {
    /// Parse schema text (JSON5 tolerated) and normalize it
    ///
    /// # Errors
    ///
    /// Returns [`LintError::SchemaLoad`] if the text is not JSON5, the root is
    /// not an object, or `$schema` / `$id` are missing.
    pub fn parse(text: &str, local_path: &str, origin: SchemaOrigin) -> Result<Self, LintError> {
        let mut document: Value = json5::from_str(text).map_err(|e| {
            LintError::schema_load(format!("Failed to parse schema {local_path}: {e}"))
        })?;

        let id = normalize_identity(&mut document)
            .map_err(|e| LintError::schema_load(format!("{local_path}: {e}")))?;

        let schema_uri = document
            .get("$schema")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                LintError::schema_load(format!("{local_path}: schema declares no $schema"))
            })?;

        Ok(Self {
            dialect: Dialect::classify(schema_uri),
            id,
            document: Arc::new(document),
            local_path: local_path.to_owned(),
            origin,
        })
    }
}

/// Move a legacy `id` to `$id` and return the identity
///
/// # Errors
///
/// Returns a description if the schema is not an object or has no string
/// identity.
pub fn normalize_identity(schema: &mut Value) -> Result<String, String> {
    let object = schema
        .as_object_mut()
        .ok_or_else(|| "schema root is not an object".to_owned())?;

    if !object.contains_key("$id")
        && let Some(legacy) = object.remove("id")
    {
        object.insert("$id".to_owned(), legacy);
    }

    object
        .get("$id")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| "schema declares no $id".to_owned())
}

/// Resolves document names to loaded schemas, memoized per schema path
pub struct SchemaRegistry<'src> {
    table: IdentityTable,
    cache: CacheStore<'src>,
    bundle: SchemaBundle<'src>,
    loaded: HashMap<String, LoadedSchema>,
}

impl<'src> SchemaRegistry<'src> {
    #[must_use]
    pub fn new(table: IdentityTable, cache: CacheStore<'src>, bundle: SchemaBundle<'src>) -> Self {
        Self {
            table,
            cache,
            bundle,
            loaded: HashMap::new(),
        }
    }

    /// The identity table this registry serves
    #[must_use]
    pub const fn table(&self) -> &IdentityTable {
        &self.table
    }

    /// Resolve the schema for a document file name
    ///
    /// Returns `Ok(None)` for names without a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::SchemaLoad`] if the base or extended schema cannot
    /// be loaded.
    pub fn resolve(
        &mut self,
        file_name: &str,
        settings: &ValidationSettings,
        pool: &mut CompilerPool,
    ) -> Result<Option<LoadedSchema>, LintError> {
        let Some(identity) = self.table.lookup(file_name).cloned() else {
            debug!("No schema configuration found for {file_name}");
            return Ok(None);
        };

        // The base is always registered so an extended schema can $ref it
        let base = self.load(&identity.local_path, pool)?;
        if base.dialect != identity.dialect_hint {
            warn!(
                "{} declares a {} dialect but {} was expected",
                base.local_path, base.dialect, identity.dialect_hint
            );
        }

        if settings.extended_validation
            && let Some(extended_path) = identity.extended_local_path.as_deref()
        {
            let extended = self.load(extended_path, pool)?;
            debug!("Using extended schema {} for {file_name}", extended.id);
            return Ok(Some(extended));
        }

        Ok(Some(base))
    }

    /// Number of distinct schemas loaded so far
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    fn load(&mut self, local_path: &str, pool: &mut CompilerPool) -> Result<LoadedSchema, LintError> {
        if let Some(loaded) = self.loaded.get(local_path) {
            return Ok(loaded.clone());
        }

        let loaded = self.read(local_path)?;
        info!(
            "Loaded {} schema {} from {}",
            loaded.dialect, loaded.id, loaded.origin
        );
        pool.add_schema(&loaded);
        self.loaded.insert(local_path.to_owned(), loaded.clone());
        Ok(loaded)
    }

    /// Cached copy first; an unparsable cached copy falls back to the bundle
    fn read(&self, local_path: &str) -> Result<LoadedSchema, LintError> {
        let cache_name = file_name_of(local_path);
        if let Some(text) = self.cache.try_get(cache_name) {
            debug!("Loading schema from cache: {cache_name}");
            match LoadedSchema::parse(&text, local_path, SchemaOrigin::Cache) {
                Ok(loaded) => return Ok(loaded),
                Err(err) => warn!("Ignoring cached schema {cache_name}: {err}"),
            }
        }

        debug!(
            "Loading schema {local_path} from {}",
            self.bundle.describe()
        );
        let text = self.bundle.read(local_path)?;
        LoadedSchema::parse(&text, local_path, SchemaOrigin::Bundle)
    }
}
