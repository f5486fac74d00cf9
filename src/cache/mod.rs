//! Cache Module
//!
//! Provides the deadline-ordered index and the concurrent TTL cache built on it.

mod entry;
mod index;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{deadline_after, CacheEntry};
pub use index::ExpiryIndex;
pub use stats::{CacheStats, StatsSnapshot};
pub use store::TtlCache;
