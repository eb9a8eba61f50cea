//! Command-line interface module
//!
//! Handles argument parsing and the `refresh`, `check` and `schemas` commands

pub mod args;
pub mod commands;

pub use args::*;
pub use commands::*;
