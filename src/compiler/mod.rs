//! Dialect-aware compiler pool
//!
//! One compiler per dialect. Each keeps the schemas registered with it (so
//! `$ref`s between them resolve without network access) and memoizes the
//! validators it has built, keyed by `$id`.

use crate::error::LintError;
use crate::predicates::{PredicateLibrary, keyword};
use crate::registry::{Dialect, LoadedSchema};
use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Key under which a schema is registered; draft-04 ids often end in `#`
fn registry_key(id: &str) -> &str {
    id.trim_end_matches('#')
}

/// Resolves `$ref`s against the schemas registered with one compiler
struct RegisteredSchemas {
    schemas: HashMap<String, Arc<Value>>,
}

impl Retrieve for RegisteredSchemas {
    fn retrieve(
        &self,
        uri: &Uri<String>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri = uri.as_str();
        self.schemas
            .get(registry_key(uri))
            .map(|schema| schema.as_ref().clone())
            .ok_or_else(|| format!("Schema {uri} is not registered").into())
    }
}

struct DialectCompiler {
    dialect: Dialect,
    predicates: Arc<PredicateLibrary>,
    schemas: HashMap<String, Arc<Value>>,
    validators: HashMap<String, Validator>,
}

impl DialectCompiler {
    fn new(dialect: Dialect, predicates: Arc<PredicateLibrary>) -> Self {
        Self {
            dialect,
            predicates,
            schemas: HashMap::new(),
            validators: HashMap::new(),
        }
    }

    fn add_schema(&mut self, id: &str, document: &Arc<Value>) -> bool {
        let key = registry_key(id);
        if self.schemas.contains_key(key) {
            return false;
        }
        debug!("Registering {} schema {key}", self.dialect);
        self.schemas.insert(key.to_owned(), Arc::clone(document));
        true
    }

    fn get_validator(&mut self, id: &str) -> Result<&Validator, LintError> {
        let key = registry_key(id);
        if !self.validators.contains_key(key) {
            let validator = self.compile(key)?;
            self.validators.insert(key.to_owned(), validator);
        }
        self.validators
            .get(key)
            .ok_or_else(|| LintError::schema_compile(format!("Validator for {key} was not stored")))
    }

    fn compile(&self, key: &str) -> Result<Validator, LintError> {
        let schema = self.schemas.get(key).ok_or_else(|| {
            LintError::schema_compile(format!(
                "Schema {key} is not registered with the {} compiler",
                self.dialect
            ))
        })?;

        let schema_uri = schema
            .get("$schema")
            .and_then(Value::as_str)
            .unwrap_or_default();

        debug!("Compiling {} schema {key}", self.dialect);

        let mut options = jsonschema::options()
            .with_draft(self.dialect.draft_for(schema_uri))
            .should_validate_formats(true)
            .with_retriever(RegisteredSchemas {
                schemas: self.schemas.clone(),
            });
        for definition in self.predicates.iter() {
            options = options.with_keyword(
                definition.kind().keyword(),
                keyword::factory(Arc::clone(definition)),
            );
        }

        options
            .build(schema)
            .map_err(|e| LintError::schema_compile(format!("Failed to compile {key}: {e}")))
    }
}

/// The legacy and modern compilers, sharing one predicate library
pub struct CompilerPool {
    legacy: DialectCompiler,
    modern: DialectCompiler,
}

impl CompilerPool {
    /// Build both compilers
    ///
    /// # Errors
    ///
    /// Returns [`LintError::SchemaCompile`] if the predicate library cannot be
    /// built.
    pub fn new() -> Result<Self, LintError> {
        let predicates = Arc::new(PredicateLibrary::new()?);
        Ok(Self {
            legacy: DialectCompiler::new(Dialect::Legacy, Arc::clone(&predicates)),
            modern: DialectCompiler::new(Dialect::Modern, predicates),
        })
    }

    fn compiler(&self, dialect: Dialect) -> &DialectCompiler {
        match dialect {
            Dialect::Legacy => &self.legacy,
            Dialect::Modern => &self.modern,
        }
    }

    fn compiler_mut(&mut self, dialect: Dialect) -> &mut DialectCompiler {
        match dialect {
            Dialect::Legacy => &mut self.legacy,
            Dialect::Modern => &mut self.modern,
        }
    }

    /// Register a schema with its dialect's compiler
    ///
    /// Returns `false` when the `$id` was already registered.
    pub fn add_schema(&mut self, schema: &LoadedSchema) -> bool {
        self.compiler_mut(schema.dialect)
            .add_schema(&schema.id, &schema.document)
    }

    /// Validator for a registered schema, compiled on first use
    ///
    /// # Errors
    ///
    /// Returns [`LintError::SchemaCompile`] if the schema (or a custom
    /// keyword's parameters) is invalid, or a `$ref` cannot be resolved.
    pub fn get_validator(&mut self, schema: &LoadedSchema) -> Result<&Validator, LintError> {
        let compiler = self.compiler_mut(schema.dialect);
        compiler.add_schema(&schema.id, &schema.document);
        compiler.get_validator(&schema.id)
    }

    /// Whether `id` is registered with the `dialect` compiler
    #[must_use]
    pub fn is_registered(&self, dialect: Dialect, id: &str) -> bool {
        self.compiler(dialect).schemas.contains_key(registry_key(id))
    }

    /// Number of validators the `dialect` compiler has built
    #[must_use]
    pub fn compiled_count(&self, dialect: Dialect) -> usize {
        self.compiler(dialect).validators.len()
    }
}
