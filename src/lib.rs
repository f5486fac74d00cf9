//! TTL Cache - A concurrent in-memory cache with per-entry expiry
//!
//! Entries are ordered in a min-heap by deadline so a background task can
//! evict everything that has expired without scanning the whole cache.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{StatsSnapshot, TtlCache};
pub use config::Config;
pub use error::{CacheError, Result};
