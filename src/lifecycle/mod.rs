//! Document lifecycle controller
//!
//! Editor-style events are queued and drained one at a time. Each event
//! decides which open documents need validating; the resulting diagnostic
//! sets are handed to a [`DiagnosticSink`], always replacing what was
//! published for that document before.

use crate::config::{SettingsProvider, ValidationSettings};
use crate::validation::{Diagnostic, Orchestrator, ValidationOutcome, document_file_name, referenced_names};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, info, warn};

/// Something that happened to a document or to the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    Opened { uri: String, text: String },
    Changed { uri: String, text: String },
    Saved { uri: String },
    Closed { uri: String },
    ConfigurationChanged,
    WatchedFilesChanged,
}

/// Receives the full diagnostic set for a document
pub trait DiagnosticSink {
    fn publish(&mut self, document_uri: &str, diagnostics: Vec<Diagnostic>);
}

/// Keeps the latest published set per document
#[derive(Debug, Default)]
pub struct CollectingSink {
    latest: BTreeMap<String, Vec<Diagnostic>>,
    publish_count: usize,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest set published for `document_uri`, if any was
    #[must_use]
    pub fn diagnostics(&self, document_uri: &str) -> Option<&[Diagnostic]> {
        self.latest.get(document_uri).map(Vec::as_slice)
    }

    /// Documents in URI order with their latest sets
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Diagnostic])> {
        self.latest
            .iter()
            .map(|(uri, diagnostics)| (uri.as_str(), diagnostics.as_slice()))
    }

    /// How many sets have been published in total
    #[must_use]
    pub const fn publish_count(&self) -> usize {
        self.publish_count
    }

    /// Total diagnostics across the latest sets
    #[must_use]
    pub fn total(&self) -> usize {
        self.latest.values().map(Vec::len).sum()
    }
}

impl DiagnosticSink for CollectingSink {
    fn publish(&mut self, document_uri: &str, diagnostics: Vec<Diagnostic>) {
        self.publish_count += 1;
        self.latest.insert(document_uri.to_owned(), diagnostics);
    }
}

struct OpenDocument {
    text: String,
    /// Lower-cased file names this document refers to
    references: BTreeSet<String>,
}

/// Single-threaded dispatcher over a FIFO event queue
pub struct LifecycleController<'src, P, K> {
    orchestrator: Orchestrator<'src>,
    settings_provider: P,
    settings: ValidationSettings,
    sink: K,
    documents: BTreeMap<String, OpenDocument>,
    queue: VecDeque<DocumentEvent>,
}

impl<'src, P: SettingsProvider, K: DiagnosticSink> LifecycleController<'src, P, K> {
    /// Create a controller, loading the initial settings
    ///
    /// # Errors
    ///
    /// Returns an error if the settings provider fails.
    pub fn new(orchestrator: Orchestrator<'src>, settings_provider: P, sink: K) -> Result<Self> {
        let settings = settings_provider
            .load()
            .context("Failed to load validation settings")?;
        Ok(Self {
            orchestrator,
            settings_provider,
            settings,
            sink,
            documents: BTreeMap::new(),
            queue: VecDeque::new(),
        })
    }

    pub fn enqueue(&mut self, event: DocumentEvent) {
        self.queue.push_back(event);
    }

    /// Drain the queue in arrival order, returning how many events ran
    pub fn run_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.queue.pop_front() {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub const fn settings(&self) -> &ValidationSettings {
        &self.settings
    }

    #[must_use]
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    #[must_use]
    pub fn into_sink(self) -> K {
        self.sink
    }

    #[must_use]
    pub const fn orchestrator(&self) -> &Orchestrator<'src> {
        &self.orchestrator
    }

    /// URIs of the open documents
    pub fn open_documents(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    fn handle(&mut self, event: DocumentEvent) {
        match event {
            DocumentEvent::Opened { uri, text } | DocumentEvent::Changed { uri, text } => {
                let references = referenced_names(&text);
                self.documents
                    .insert(uri.clone(), OpenDocument { text, references });
                self.validate(&uri);
            }
            DocumentEvent::Saved { uri } => {
                let saved = document_file_name(&uri);
                let dependents: Vec<String> = self
                    .documents
                    .iter()
                    .filter(|(other, document)| {
                        **other != uri && document.references.contains(&saved)
                    })
                    .map(|(other, _)| other.clone())
                    .collect();
                debug!("{saved} saved; {} dependent document(s)", dependents.len());
                for dependent in dependents {
                    self.validate(&dependent);
                }
            }
            DocumentEvent::Closed { uri } => {
                self.documents.remove(&uri);
                self.sink.publish(&uri, Vec::new());
            }
            DocumentEvent::ConfigurationChanged | DocumentEvent::WatchedFilesChanged => {
                self.reload_settings();
                self.validate_all();
            }
        }
    }

    fn reload_settings(&mut self) {
        match self.settings_provider.load() {
            Ok(settings) => {
                if settings != self.settings {
                    info!(
                        "Extended validation {}",
                        if settings.extended_validation {
                            "enabled"
                        } else {
                            "disabled"
                        }
                    );
                }
                self.settings = settings;
            }
            Err(err) => warn!("Keeping previous settings: {err:#}"),
        }
    }

    fn validate_all(&mut self) {
        let uris: Vec<String> = self.documents.keys().cloned().collect();
        for uri in uris {
            self.validate(&uri);
        }
    }

    fn validate(&mut self, uri: &str) {
        let Some(document) = self.documents.get(uri) else {
            return;
        };
        match self
            .orchestrator
            .validate(uri, &document.text, &self.settings)
        {
            ValidationOutcome::Publish(diagnostics) => self.sink.publish(uri, diagnostics),
            ValidationOutcome::Unchanged => debug!("Diagnostics for {uri} left unchanged"),
        }
    }
}
