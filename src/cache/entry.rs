//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with an absolute deadline.

use std::time::Duration;

use tokio::time::Instant;

/// Upper bound applied when `now + ttl` would overflow (about 30 years).
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

// == Cache Entry ==
/// Represents a single cache entry with value and deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The key this entry is stored under
    pub key: String,
    /// The stored value
    pub value: V,
    /// Absolute expiration deadline
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring at `expires_at`.
    pub fn new(key: String, value: V, expires_at: Instant) -> Self {
        Self {
            key,
            value,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry whose deadline equals `now` is expired.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at <= now
    }

    // == Time To Live ==
    /// Returns the time left before `expires_at`, or zero once expired.
    pub fn ttl_remaining_at(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

// == Utility Functions ==
/// Computes the deadline `ttl` after `now`, saturating instead of overflowing.
pub fn deadline_after(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl).unwrap_or(now + FAR_FUTURE)
}
