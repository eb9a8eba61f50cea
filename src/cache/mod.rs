//! Local schema cache
//!
//! Remote schemas are persisted in a flat directory and rewritten only when
//! their content checksum changes.

pub mod checksum;
pub mod store;

pub use checksum::Checksum;
pub use store::{CacheStore, CachedSchemaEntry};
