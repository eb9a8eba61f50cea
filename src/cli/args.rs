use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for connector-lint
#[derive(Parser, Debug, Clone)]
#[command(name = "connector-lint")]
#[command(about = "Validate API connector definition files against their JSON schemas")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Directory holding downloaded schemas
    #[arg(long, global = true, value_name = "DIR", env = "CONNECTOR_LINT_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Read bundled schemas from this directory instead of the built-in copies
    #[arg(long, global = true, value_name = "DIR")]
    pub schema_dir: Option<PathBuf>,

    /// Base URL the upstream schemas are downloaded from
    #[arg(
        long,
        global = true,
        value_name = "URL",
        env = "CONNECTOR_LINT_REMOTE_BASE",
        default_value = crate::config::identity::REMOTE_SCHEMA_BASE
    )]
    pub remote_base: String,

    /// Settings file path
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        default_value = crate::config::DEFAULT_SETTINGS_FILE
    )]
    pub settings: PathBuf,

    /// Validate against base schemas only
    #[arg(long, global = true)]
    pub no_extended: bool,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// `extendedValidation` forced from the command line, if any
    #[must_use]
    pub const fn extended_override(&self) -> Option<bool> {
        if self.no_extended { Some(false) } else { None }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Download the upstream schemas into the cache
    Refresh,

    /// Validate connector files
    Check {
        /// Files to validate
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Exit with a non-zero code when any problem is reported
        #[arg(long)]
        deny_warnings: bool,

        /// Use the cached or bundled schemas without downloading first
        #[arg(long)]
        offline: bool,
    },

    /// List the linted document names and their schemas
    Schemas,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
