//! Bundled fallback copies of the connector schemas

use crate::config::identity::file_name_of;
use crate::error::LintError;
use crate::system::System;
use std::path::PathBuf;

/// Schemas compiled into the binary, keyed by file name
const EMBEDDED: &[(&str, &str)] = &[
    (
        "paconn-settings.schema.json",
        include_str!("../../schemas/paconn-settings.schema.json"),
    ),
    (
        "paconn-apiProperties.schema.json",
        include_str!("../../schemas/paconn-apiProperties.schema.json"),
    ),
    (
        "paconn-apiProperties.extended.schema.json",
        include_str!("../../schemas/paconn-apiProperties.extended.schema.json"),
    ),
    (
        "apiDefinition.swagger.schema.json",
        include_str!("../../schemas/apiDefinition.swagger.schema.json"),
    ),
    (
        "apiDefinition.swagger.extended.schema.json",
        include_str!("../../schemas/apiDefinition.swagger.extended.schema.json"),
    ),
];

/// Where bundled schema copies are read from
pub enum SchemaBundle<'src> {
    /// The copies shipped inside the binary
    Embedded,
    /// A directory; identity local paths are resolved relative to it
    Directory {
        system: &'src dyn System,
        root: PathBuf,
    },
}

impl<'src> SchemaBundle<'src> {
    /// Bundle rooted at a directory on `system`
    #[must_use]
    pub fn directory(system: &'src dyn System, root: impl Into<PathBuf>) -> Self {
        Self::Directory {
            system,
            root: root.into(),
        }
    }

    /// Read the bundled copy at `local_path`
    ///
    /// # Errors
    ///
    /// Returns [`LintError::SchemaLoad`] if no bundled copy exists or it
    /// cannot be read.
    pub fn read(&self, local_path: &str) -> Result<String, LintError> {
        match self {
            Self::Embedded => {
                let name = file_name_of(local_path);
                EMBEDDED
                    .iter()
                    .find(|(embedded, _)| *embedded == name)
                    .map(|(_, content)| (*content).to_owned())
                    .ok_or_else(|| {
                        LintError::schema_load(format!("No bundled schema named {name}"))
                    })
            }
            Self::Directory { system, root } => {
                let path = root.join(local_path);
                system.read_to_string(&path).map_err(|e| {
                    LintError::schema_load(format!(
                        "Failed to read bundled schema {}: {e}",
                        path.display()
                    ))
                })
            }
        }
    }

    /// Short description for log lines
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Embedded => "embedded schemas".to_owned(),
            Self::Directory { root, .. } => root.display().to_string(),
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use super::*;
    use crate::config::IdentityTable;
    use crate::system::MockSystem;

    #[test]
    fn every_builtin_identity_has_an_embedded_copy() {
        let bundle = SchemaBundle::Embedded;
        for identity in IdentityTable::builtin().iter() {
            bundle.read(&identity.local_path).unwrap();
            if let Some(extended) = identity.extended_local_path.as_deref() {
                bundle.read(extended).unwrap();
            }
        }
    }

    #[test]
    fn directory_bundle_resolves_relative_paths() {
        let system = MockSystem::new()
            .with_file("/bundle/schemas/a.schema.json", b"{}")
            .unwrap();
        let bundle = SchemaBundle::directory(&system, "/bundle");
        assert_eq!(bundle.read("schemas/a.schema.json").unwrap(), "{}");
        let err = bundle.read("schemas/b.schema.json").unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
