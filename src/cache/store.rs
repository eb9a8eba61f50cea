//! Checksum-gated schema cache on disk

use super::checksum::Checksum;
use crate::system::System;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A schema as currently stored in the cache directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSchemaEntry {
    pub logical_name: String,
    pub content: String,
    pub checksum: Checksum,
}

/// Flat directory of fetched schema text, one file per logical name
///
/// Files are only rewritten when the checksum of the new content differs from
/// the stored one. I/O failures are logged and degrade to a cache miss.
pub struct CacheStore<'src> {
    root: PathBuf,
    system: &'src dyn System,
}

impl<'src> CacheStore<'src> {
    /// Create a store rooted at `root`; the directory is created on first write
    #[must_use]
    pub fn new(system: &'src dyn System, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            system,
        }
    }

    /// Cache root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `content` under `logical_name` if it differs from the stored copy
    ///
    /// Returns whether a write occurred.
    pub fn put(&self, logical_name: &str, content: &str) -> bool {
        let Some(path) = self.path_for(logical_name) else {
            warn!("Refusing to cache schema with invalid name: {logical_name:?}");
            return false;
        };

        let fresh = Checksum::of_str(content);
        if let Some(existing) = self.entry(logical_name)
            && existing.checksum == fresh
        {
            debug!("Cached schema unchanged: {}", path.display());
            return false;
        }

        if let Err(err) = self.ensure_root() {
            warn!(
                "Failed to create cache directory {}: {err}",
                self.root.display()
            );
            return false;
        }

        match self.system.write(&path, content.as_bytes()) {
            Ok(()) => {
                info!("Cached schema: {}", path.display());
                true
            }
            Err(err) => {
                warn!("Failed to write cached schema {}: {err}", path.display());
                false
            }
        }
    }

    /// Read the cached text for `logical_name`, if any
    #[must_use]
    pub fn try_get(&self, logical_name: &str) -> Option<String> {
        self.entry(logical_name).map(|entry| entry.content)
    }

    /// Read the cached entry for `logical_name` together with its checksum
    #[must_use]
    pub fn entry(&self, logical_name: &str) -> Option<CachedSchemaEntry> {
        let path = self.path_for(logical_name)?;
        match self.system.is_file(&path) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(err) => {
                warn!("Failed to inspect cached schema {}: {err}", path.display());
                return None;
            }
        }

        match self.system.read_to_string(&path) {
            Ok(content) => Some(CachedSchemaEntry {
                logical_name: logical_name.to_owned(),
                checksum: Checksum::of_str(&content),
                content,
            }),
            Err(err) => {
                warn!("Failed to read cached schema {}: {err}", path.display());
                None
            }
        }
    }

    /// Whether a cached copy exists for `logical_name`
    #[must_use]
    pub fn contains(&self, logical_name: &str) -> bool {
        self.path_for(logical_name)
            .is_some_and(|path| self.system.is_file(&path).unwrap_or(false))
    }

    fn ensure_root(&self) -> std::io::Result<()> {
        if self.system.is_dir(&self.root)? {
            return Ok(());
        }
        self.system.create_dir_all(&self.root)
    }

    /// Only plain file names are accepted; the cache is flat
    fn path_for(&self, logical_name: &str) -> Option<PathBuf> {
        let is_plain = !logical_name.is_empty()
            && logical_name != "."
            && logical_name != ".."
            && !logical_name.contains(['/', '\\']);
        is_plain.then(|| self.root.join(logical_name))
    }
}
