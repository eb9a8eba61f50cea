//! # connector-lint
//!
//! Command-line front end for the connector schema linter.
//!
//! ```sh
//! connector-lint refresh
//! connector-lint check apiProperties.json apiDefinition.swagger.json
//! connector-lint --no-extended check --format json settings.json
//! ```

use anyhow::Result;
use clap::Parser as _;
use connector_lint::cli::Args;
use connector_lint::error::LintError;
use connector_lint::system::RealSystem;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let system = RealSystem::new();
    match connector_lint::run(&args, &system) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            error!("{err:#}");
            std::process::exit(
                err.downcast_ref::<LintError>()
                    .map_or(1, LintError::exit_code),
            );
        }
    }
}
