//! JSON Schema validation for the settings file

use anyhow::{Result, anyhow};
use jsonschema::{Draft, Validator};
use serde_json::Value;

/// Get the embedded JSON schema for the settings file, compiled
pub fn get_schema() -> Result<Validator> {
    let schema_str = include_str!("../../docs/settings.schema.json");
    let schema: Value = serde_json::from_str(schema_str)
        .map_err(|e| anyhow!("Failed to parse embedded settings schema: {}", e))?;

    jsonschema::options()
        .with_draft(Draft::Draft7)
        .build(&schema)
        .map_err(|e| anyhow!("Failed to compile settings schema: {}", e))
}

/// Validate a settings value against the schema
pub fn validate_against_schema(settings: &Value) -> Result<()> {
    let schema = get_schema()?;

    let error_messages: Vec<String> = schema
        .iter_errors(settings)
        .map(|e| format!("  - Path '{}': {}", e.instance_path, e))
        .collect();

    if !error_messages.is_empty() {
        return Err(anyhow!(
            "Settings validation failed:\n{}",
            error_messages.join("\n")
        ));
    }

    Ok(())
}
