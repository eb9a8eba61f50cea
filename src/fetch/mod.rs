//! Remote schema fetching
//!
//! Downloads upstream schema documents and hands them to the cache store.
//! Failures are logged and never propagate past [`SchemaFetcher::refresh`]:
//! the cache simply keeps its last good copy.

use crate::cache::CacheStore;
use crate::config::{IdentityTable, SchemaIdentity};
use crate::error::LintError;
use async_trait::async_trait;
use std::fmt;
use tracing::{debug, warn};
use url::Url;

/// Something that can produce the text of a remote schema
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Fetch the document at `url`
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Fetch`] on transport errors or non-success status.
    async fn fetch(&self, url: &str) -> Result<String, LintError>;
}

/// HTTP GET via reqwest; no retries, no timeout
pub struct HttpSchemaSource {
    client: reqwest::Client,
}

impl HttpSchemaSource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpSchemaSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SchemaSource for HttpSchemaSource {
    async fn fetch(&self, url: &str) -> Result<String, LintError> {
        let url = Url::parse(url)
            .map_err(|e| LintError::fetch(format!("Invalid schema URL {url}: {e}")))?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| LintError::fetch(format!("Failed to fetch {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(LintError::fetch(format!(
                "Failed to fetch {url}: HTTP {}",
                response.status().as_u16()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| LintError::fetch(format!("Failed to read body of {url}: {e}")))
    }
}

/// What happened to one schema during a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStatus {
    Written,
    Unchanged,
    Failed,
}

/// Counts for a refresh of the whole identity table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub written: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl RefreshReport {
    pub fn record(&mut self, status: RefreshStatus) {
        match status {
            RefreshStatus::Written => self.written += 1,
            RefreshStatus::Unchanged => self.unchanged += 1,
            RefreshStatus::Failed => self.failed += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.written + self.unchanged + self.failed
    }
}

impl fmt::Display for RefreshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} written, {} unchanged, {} failed",
            self.written, self.unchanged, self.failed
        )
    }
}

/// Keeps the cache in step with the upstream schemas
pub struct SchemaFetcher<S> {
    source: S,
}

impl<S: SchemaSource> SchemaFetcher<S> {
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch one identity's schema into the cache
    pub async fn refresh(&self, identity: &SchemaIdentity, cache: &CacheStore<'_>) -> RefreshStatus {
        debug!("Fetching {}", identity.remote_url);
        match self.source.fetch(&identity.remote_url).await {
            Ok(content) => {
                if cache.put(identity.cache_name(), &content) {
                    debug!("Updated cached schema {}", identity.cache_name());
                    RefreshStatus::Written
                } else {
                    debug!("Cached schema {} is current", identity.cache_name());
                    RefreshStatus::Unchanged
                }
            }
            Err(err) => {
                warn!("Keeping cached copy of {}: {err}", identity.cache_name());
                RefreshStatus::Failed
            }
        }
    }

    /// Refresh every entry of the table, one after another
    ///
    /// `on_each` sees every identity once its refresh has finished.
    pub async fn refresh_all(
        &self,
        table: &IdentityTable,
        cache: &CacheStore<'_>,
        mut on_each: impl FnMut(&SchemaIdentity, RefreshStatus),
    ) -> RefreshReport {
        let mut report = RefreshReport::default();
        for identity in table.iter() {
            let status = self.refresh(identity, cache).await;
            on_each(identity, status);
            report.record(status);
        }
        report
    }
}
