//! Error types for the TTL cache
//!
//! Provides unified error handling using thiserror. Missing or expired keys
//! are never errors: reads report absence with `None`.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Configuration rejected at construction time
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Cache constructed outside of a Tokio runtime
    #[error("No Tokio runtime available to run the sweep task")]
    NoRuntime,

    /// Heap or key map failed an integrity check
    #[error("Index corrupted: {0}")]
    IndexCorrupted(String),

    /// The background sweep task could not be joined
    #[error("Sweep task failed: {0}")]
    TaskFailed(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
