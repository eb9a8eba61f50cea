//! CLI command implementations

use crate::cache::CacheStore;
use crate::cli::{Args, OutputFormat};
use crate::compiler::CompilerPool;
use crate::config::{FileSettings, IdentityTable};
use crate::error::LintError;
use crate::fetch::{HttpSchemaSource, RefreshReport, SchemaFetcher};
use crate::lifecycle::{CollectingSink, DocumentEvent, LifecycleController};
use crate::registry::{SchemaBundle, SchemaRegistry};
use crate::system::System;
use crate::validation::{Diagnostic, Orchestrator};
use anyhow::{Context as _, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

/// Cache directory from the arguments, else the per-user default
///
/// # Errors
///
/// Returns a configuration error when no default cache directory exists.
pub fn cache_dir(args: &Args) -> Result<PathBuf> {
    if let Some(dir) = &args.cache_dir {
        return Ok(dir.clone());
    }
    dirs::cache_dir()
        .map(|dir| dir.join("connector-lint").join("schemas"))
        .ok_or_else(|| {
            LintError::configuration("No cache directory available; pass --cache-dir").into()
        })
}

fn bundle<'src>(args: &Args, system: &'src dyn System) -> SchemaBundle<'src> {
    args.schema_dir
        .as_ref()
        .map_or(SchemaBundle::Embedded, |dir| {
            SchemaBundle::directory(system, dir)
        })
}

fn identity_table(args: &Args) -> IdentityTable {
    IdentityTable::from_remote_base(&args.remote_base)
}

/// Download every schema of `table` into `cache`, ticking `progress` per schema
fn refresh_cache(
    table: &IdentityTable,
    cache: &CacheStore<'_>,
    progress: &ProgressBar,
) -> Result<RefreshReport> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    let fetcher = SchemaFetcher::new(HttpSchemaSource::new());

    let report = runtime.block_on(fetcher.refresh_all(table, cache, |identity, _| {
        progress.set_message(identity.cache_name().to_owned());
        progress.inc(1);
    }));
    progress.finish_and_clear();
    Ok(report)
}

/// Fetch every upstream schema into the cache
///
/// # Errors
///
/// Returns a fetch error when any schema could not be refreshed.
pub fn execute_refresh(args: &Args, system: &dyn System) -> Result<RefreshReport> {
    let cache = CacheStore::new(system, cache_dir(args)?);
    let table = identity_table(args);

    let progress = ProgressBar::new(table.iter().count() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{pos}/{len}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let report = refresh_cache(&table, &cache, &progress)?;

    println!("{}: {report}", cache.root().display());

    if report.failed > 0 {
        return Err(LintError::fetch(format!(
            "{} of {} schemas could not be fetched",
            report.failed,
            report.total()
        ))
        .into());
    }
    Ok(report)
}

/// Per-file result of `check`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file: String,
    pub uri: String,
    /// Whether a schema applied to the file
    pub linted: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Options of the `check` subcommand
#[derive(Debug, Clone, Copy)]
pub struct CheckOptions {
    pub format: OutputFormat,
    pub deny_warnings: bool,
    /// Skip the schema download that normally precedes validation
    pub offline: bool,
}

/// Refresh the schema cache, then validate files and print their diagnostics
///
/// Download failures only leave the cache as it was; validation then uses
/// the cached or bundled schemas.
///
/// # Errors
///
/// Returns an error if a file cannot be read, the settings are invalid, or
/// `deny_warnings` is set and any problem was reported.
pub fn execute_check(
    args: &Args,
    files: &[PathBuf],
    options: &CheckOptions,
    system: &dyn System,
) -> Result<Vec<FileReport>> {
    let cache = CacheStore::new(system, cache_dir(args)?);
    let table = identity_table(args);
    if options.offline {
        debug!("Offline, using cached or bundled schemas");
    } else {
        let report = refresh_cache(&table, &cache, &ProgressBar::hidden())?;
        if report.failed > 0 {
            warn!("Schema refresh incomplete ({report}); falling back to cached or bundled copies");
        }
    }

    let registry = SchemaRegistry::new(table, cache, bundle(args, system));
    let orchestrator = Orchestrator::new(registry, CompilerPool::new()?);
    let settings = FileSettings::new(system, &args.settings)
        .with_extended_override(args.extended_override());
    let mut controller = LifecycleController::new(orchestrator, settings, CollectingSink::new())?;

    let mut documents = Vec::with_capacity(files.len());
    for file in files {
        let text = system.read_to_string(file).map_err(|e| {
            LintError::filesystem(format!("Failed to read {}: {e}", file.display()))
        })?;
        let uri = document_uri(file);
        controller.enqueue(DocumentEvent::Opened {
            uri: uri.clone(),
            text,
        });
        documents.push((file, uri));
    }
    controller.run_pending();
    let sink = controller.into_sink();

    let reports: Vec<FileReport> = documents
        .into_iter()
        .map(|(file, uri)| {
            let published = sink.diagnostics(&uri);
            FileReport {
                file: file.display().to_string(),
                linted: published.is_some(),
                diagnostics: published.map(<[Diagnostic]>::to_vec).unwrap_or_default(),
                uri,
            }
        })
        .collect();

    match options.format {
        OutputFormat::Text => print_text(&reports),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&reports).context("Failed to serialize diagnostics")?
        ),
    }

    let count: usize = reports.iter().map(|report| report.diagnostics.len()).sum();
    info!("{count} problem(s) in {} file(s)", reports.len());
    if options.deny_warnings && count > 0 {
        return Err(LintError::Findings { count }.into());
    }
    Ok(reports)
}

fn print_text(reports: &[FileReport]) {
    for report in reports {
        if !report.linted {
            println!("{}: skipped, no schema for this file name", report.file);
        } else if report.diagnostics.is_empty() {
            println!("{}: ok", report.file);
        } else {
            println!("{}: {} problem(s)", report.file, report.diagnostics.len());
            for diagnostic in &report.diagnostics {
                println!("  {diagnostic}");
            }
        }
    }
}

/// `file://` URI for a path, or the path itself if it cannot be made absolute
fn document_uri(file: &Path) -> String {
    std::path::absolute(file)
        .ok()
        .and_then(|absolute| Url::from_file_path(absolute).ok())
        .map_or_else(
            || {
                warn!("Using {} as a plain document name", file.display());
                file.display().to_string()
            },
            |url| url.to_string(),
        )
}

/// Print the identity table and the cache state of each schema
///
/// # Errors
///
/// Returns a configuration error when no cache directory is available.
pub fn execute_schemas(args: &Args, system: &dyn System) -> Result<()> {
    let cache = CacheStore::new(system, cache_dir(args)?);

    println!("cache: {}", cache.root().display());
    for identity in identity_table(args).iter() {
        let cached = if cache.contains(identity.cache_name()) {
            "cached"
        } else {
            "bundled"
        };
        println!(
            "{} ({}, {cached})\n  base:     {}",
            identity.document_name, identity.dialect_hint, identity.local_path
        );
        if let Some(extended) = &identity.extended_local_path {
            println!("  extended: {extended}");
        }
        println!("  remote:   {}", identity.remote_url);
    }
    Ok(())
}
