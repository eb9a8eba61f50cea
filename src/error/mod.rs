//! Error handling module
//!
//! Defines the linter error taxonomy with exit codes

pub mod types;

pub use types::*;
