//! Configuration Module
//!
//! Handles loading and validating cache configuration.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default interval between background sweeps, in milliseconds.
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 3000;

/// Cache configuration parameters.
///
/// The sweep interval trades eviction latency for lock contention: every tick
/// takes the exclusive lock once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interval between background sweeps of expired entries
    pub sweep_interval: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 3000)
    pub fn from_env() -> Self {
        let sweep_interval_ms = env::var("SWEEP_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_MS);

        Self {
            sweep_interval: Duration::from_millis(sweep_interval_ms),
        }
    }

    /// Returns a copy of this config with a different sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Rejects settings the sweep task cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "sweep interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS),
        }
    }
}
