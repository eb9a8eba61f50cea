//! Custom predicate library
//!
//! Named, parameterized keywords layered on top of standard JSON Schema:
//! sentence structure, casing conventions, controlled vocabularies and
//! forbidden terms. The catalog is fixed and registered once into every
//! compiler through [`PredicateLibrary`].

pub mod catalog;
pub(crate) mod keyword;

pub use catalog::{ALLOWED_CATEGORIES, Predicate, PredicateKind};

use crate::error::LintError;
use jsonschema::Validator;
use serde_json::Value;
use std::sync::Arc;

/// One catalog entry: its kind plus the compiled metaschema for its parameters
pub struct PredicateDefinition {
    kind: PredicateKind,
    metaschema: Validator,
}

impl PredicateDefinition {
    fn new(kind: PredicateKind) -> Result<Self, LintError> {
        let metaschema = jsonschema::validator_for(&kind.metaschema()).map_err(|e| {
            LintError::schema_compile(format!(
                "Invalid metaschema for keyword {}: {e}",
                kind.keyword()
            ))
        })?;
        Ok(Self { kind, metaschema })
    }

    /// Which predicate this entry describes
    #[must_use]
    pub const fn kind(&self) -> PredicateKind {
        self.kind
    }

    /// Check `parameters` against the metaschema and bind them
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the parameters are malformed.
    pub fn bind(&self, parameters: &Value) -> Result<Predicate, String> {
        let problems: Vec<String> = self
            .metaschema
            .iter_errors(parameters)
            .map(|e| e.to_string())
            .collect();
        if !problems.is_empty() {
            return Err(format!(
                "keyword {} value is invalid: {}",
                self.kind.keyword(),
                problems.join("; ")
            ));
        }
        Predicate::bind(self.kind, parameters)
    }
}

/// The full catalog, shared by the legacy and modern compilers
pub struct PredicateLibrary {
    definitions: Vec<Arc<PredicateDefinition>>,
}

impl PredicateLibrary {
    /// Build every catalog entry
    ///
    /// # Errors
    ///
    /// Returns [`LintError::SchemaCompile`] if a metaschema does not compile.
    pub fn new() -> Result<Self, LintError> {
        let definitions = PredicateKind::ALL
            .into_iter()
            .map(|kind| PredicateDefinition::new(kind).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { definitions })
    }

    /// Entry registered under a schema keyword
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&Arc<PredicateDefinition>> {
        let kind = PredicateKind::from_keyword(keyword)?;
        self.definitions
            .iter()
            .find(|definition| definition.kind == kind)
    }

    /// All entries in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<PredicateDefinition>> {
        self.definitions.iter()
    }

    /// Number of catalog entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
