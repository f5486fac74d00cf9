//! Cache Store Module
//!
//! Main cache engine: the expiry index behind a single reader-writer lock,
//! plus the background sweep task that owns eviction.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::cache::{deadline_after, CacheStats, ExpiryIndex, StatsSnapshot};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweep_task, sweep_once};

// == TTL Cache ==
/// Concurrent key-value cache where every entry carries its own deadline.
///
/// Reads take the shared lock and never mutate the index: an expired entry
/// reads as absent and stays indexed until the next sweep. Writes and sweeps
/// take the exclusive lock.
///
/// Share a cache between tasks with `Arc<TtlCache<V>>`.
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Deadline-ordered entries
    index: Arc<RwLock<ExpiryIndex<V>>>,
    /// Activity counters
    stats: Arc<CacheStats>,
    /// Signals the sweep task to exit
    shutdown_tx: watch::Sender<bool>,
    /// Sweep task handle, taken on shutdown
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl<V> TtlCache<V>
where
    V: Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty cache with the default configuration and starts its
    /// sweep task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Creates an empty cache with a custom configuration and starts its
    /// sweep task.
    ///
    /// # Errors
    /// - `InvalidConfig` if the sweep interval is zero
    /// - `NoRuntime` if no Tokio runtime is running on this thread
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        tokio::runtime::Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        let index = Arc::new(RwLock::new(ExpiryIndex::new()));
        let stats = Arc::new(CacheStats::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = spawn_sweep_task(
            index.clone(),
            stats.clone(),
            config.sweep_interval,
            shutdown_rx,
        );

        Ok(Self {
            index,
            stats,
            shutdown_tx,
            sweeper: Mutex::new(Some(handle)),
        })
    }

    // == Set ==
    /// Stores `value` under `key`, expiring `ttl` from now.
    ///
    /// Overwrites any existing entry, value and deadline both. A zero `ttl`
    /// stores an entry that is already expired.
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let mut index = self.index.write().await;
        // Deadline taken under the lock so grant order is effective order
        let expires_at = deadline_after(Instant::now(), ttl);
        let replaced = index.upsert(key, value, expires_at).is_some();
        drop(index);

        self.stats.record_set();
        debug!(replaced, ttl_ms = ttl.as_millis() as u64, "cache set");
    }

    // == Get ==
    /// Returns the value stored under `key` if its deadline has not passed.
    ///
    /// Missing and expired keys both read as `None`.
    pub async fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let index = self.index.read().await;
        let now = Instant::now();

        match index.lookup(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Removes the entry stored under `key`, returning its value even if it
    /// had already expired.
    pub async fn remove(&self, key: &str) -> Option<V> {
        let removed = self.index.write().await.remove(key);
        if removed.is_some() {
            self.stats.record_removal();
        }
        removed.map(|entry| entry.value)
    }

    // == Length ==
    /// Returns the number of indexed entries, counting expired entries the
    /// sweep has not reached yet.
    pub async fn len(&self) -> usize {
        self.index.read().await.len()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.index.read().await.is_empty()
    }

    // == Sweep Now ==
    /// Runs one sweep immediately, outside the regular schedule.
    pub async fn sweep_now(&self) -> usize {
        sweep_once(&self.index, &self.stats).await
    }

    // == Check Integrity ==
    /// Verifies heap order and key bookkeeping under the shared lock.
    pub async fn check_integrity(&self) -> Result<()> {
        self.index.read().await.validate()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    // == Shutdown ==
    /// Stops the sweep task and waits for it to exit.
    ///
    /// Safe to call more than once. The cache stays readable and writable
    /// afterwards, but expired entries are no longer swept.
    pub async fn shutdown(&self) -> Result<()> {
        // Fails only when the task is already gone
        let _ = self.shutdown_tx.send(true);

        let handle = self.sweeper.lock().await.take();
        if let Some(handle) = handle {
            handle
                .await
                .map_err(|err| CacheError::TaskFailed(err.to_string()))?;
            info!("Cache shut down");
        }
        Ok(())
    }
}

impl<V> Drop for TtlCache<V> {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}
