//! YAML settings loading and parsing

use crate::config::ValidationSettings;
use crate::error::LintError;
use crate::system::System;
use anyhow::{Context as _, Result};
use serde_json::Value;
use std::path::Path;

/// Load, validate and parse the YAML settings file at `path`
///
/// An empty file yields the default settings.
pub fn load_settings(system: &dyn System, path: &Path) -> Result<ValidationSettings> {
    if !system.exists(path)? {
        return Err(LintError::configuration(format!(
            "Settings file not found: {}",
            path.display()
        ))
        .into());
    }

    let content = system
        .read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

    let raw: Value = serde_yaml::from_str(&content).map_err(|e| {
        LintError::configuration(format!(
            "Failed to parse YAML settings in file {}: {e}",
            path.display()
        ))
    })?;

    if raw.is_null() {
        return Ok(ValidationSettings::default());
    }

    crate::config::schema::validate_against_schema(&raw)
        .map_err(|e| LintError::configuration(format!("{}: {e}", path.display())))?;

    let settings = serde_json::from_value(raw)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    Ok(settings)
}
