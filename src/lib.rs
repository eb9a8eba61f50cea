//! `connector-lint` - validates API connector definition files against
//! versioned JSON schemas
//!
//! Schemas are fetched from upstream into a checksum-verified cache, with
//! bundled copies as a fallback. Each document is dispatched by file name to
//! its schema, compiled by the compiler for the schema's dialect (draft-04 or
//! later) with a set of custom keywords, and its failures are reported as
//! replace-all diagnostic sets.

pub mod cache;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod fetch;
pub mod lifecycle;
pub mod predicates;
pub mod registry;
pub mod system;
pub mod validation;

use anyhow::Result;
use cli::{Args, Command};
use system::System;

/// Main entry point for the connector-lint library
pub fn run(args: &Args, system: &dyn System) -> Result<()> {
    match &args.command {
        Command::Refresh => cli::execute_refresh(args, system).map(|_| ()),
        Command::Check {
            files,
            format,
            deny_warnings,
            offline,
        } => cli::execute_check(
            args,
            files,
            &cli::CheckOptions {
                format: *format,
                deny_warnings: *deny_warnings,
                offline: *offline,
            },
            system,
        )
        .map(|_| ()),
        Command::Schemas => cli::execute_schemas(args, system),
    }
}
