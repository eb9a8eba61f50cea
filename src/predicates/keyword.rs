//! Adapter between the predicate catalog and the schema compiler

use super::PredicateDefinition;
use super::catalog::Predicate;
use jsonschema::paths::{LazyLocation, Location};
use jsonschema::{Keyword, ValidationError};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A compiled custom keyword inside a validator
struct PredicateKeyword {
    predicate: Predicate,
    schema_path: Location,
}

impl Keyword for PredicateKeyword {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        location: &LazyLocation,
    ) -> Result<(), ValidationError<'i>> {
        self.predicate.check(instance).map_err(|message| {
            ValidationError::custom(
                self.schema_path.clone(),
                location.into(),
                instance,
                message,
            )
        })
    }

    fn is_valid(&self, instance: &Value) -> bool {
        self.predicate.check(instance).is_ok()
    }
}

/// Factory registered with the compiler for one catalog entry
///
/// Rejects parameters that do not match the entry's metaschema, which makes
/// the whole schema fail to compile.
pub(crate) fn factory(
    definition: Arc<PredicateDefinition>,
) -> impl for<'a> Fn(&'a Map<String, Value>, &'a Value, Location) -> Result<Box<dyn Keyword>, ValidationError<'a>>
+ Send
+ Sync
+ 'static {
    move |_parent, parameters, path| {
        let predicate = definition.bind(parameters).map_err(|reason| {
            ValidationError::custom(Location::new(), path.clone(), parameters, reason)
        })?;
        Ok(Box::new(PredicateKeyword {
            predicate,
            schema_path: path,
        }))
    }
}
