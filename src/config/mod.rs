//! Configuration management module
//!
//! Holds the schema identity table and the validation settings, which are
//! loaded from an optional YAML file and validated against an embedded JSON
//! schema before use.

pub mod identity;
pub mod schema;
pub mod yaml;

pub use identity::{IdentityTable, SchemaIdentity};

use crate::system::System;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Default settings file, looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "connector-lint.yaml";

/// Settings that influence schema resolution
///
/// Passed explicitly into every resolve/validate call and replaced only
/// through [`SettingsProvider::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSettings {
    /// Layer the extended schema over the base one where configured
    #[serde(default = "default_true")]
    pub extended_validation: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            extended_validation: true,
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Source of [`ValidationSettings`], consulted on every configuration reload
pub trait SettingsProvider {
    /// Produce the current settings
    fn load(&self) -> anyhow::Result<ValidationSettings>;
}

/// Settings that never change
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSettings(pub ValidationSettings);

impl SettingsProvider for FixedSettings {
    fn load(&self) -> anyhow::Result<ValidationSettings> {
        Ok(self.0)
    }
}

/// Settings read from a YAML file, re-read on every reload
///
/// A missing file yields the defaults. `extended_override` (from the command
/// line) wins over the file.
pub struct FileSettings<'src> {
    system: &'src dyn System,
    path: PathBuf,
    extended_override: Option<bool>,
}

impl<'src> FileSettings<'src> {
    /// Create a provider reading `path`
    #[must_use]
    pub fn new(system: &'src dyn System, path: impl Into<PathBuf>) -> Self {
        Self {
            system,
            path: path.into(),
            extended_override: None,
        }
    }

    /// Force `extendedValidation` regardless of the file (builder pattern)
    #[must_use]
    pub const fn with_extended_override(mut self, extended: Option<bool>) -> Self {
        self.extended_override = extended;
        self
    }
}

impl SettingsProvider for FileSettings<'_> {
    fn load(&self) -> anyhow::Result<ValidationSettings> {
        let mut settings = if self.system.exists(&self.path)? {
            yaml::load_settings(self.system, &self.path)?
        } else {
            debug!(
                "No settings file at {}, using defaults",
                self.path.display()
            );
            ValidationSettings::default()
        };

        if let Some(extended) = self.extended_override {
            settings.extended_validation = extended;
        }
        Ok(settings)
    }
}
