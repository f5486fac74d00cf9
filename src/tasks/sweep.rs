//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, ExpiryIndex};

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The first tick fires one full `interval` after spawning. Each tick takes
/// the write lock once and pops every entry whose deadline has passed.
///
/// The task exits when `shutdown_rx` observes `true` or its sender is dropped.
///
/// # Example
/// ```ignore
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let handle = spawn_sweep_task(index, stats, Duration::from_secs(3), shutdown_rx);
/// // Later, during shutdown:
/// shutdown_tx.send(true).ok();
/// handle.await?;
/// ```
pub fn spawn_sweep_task<V>(
    index: Arc<RwLock<ExpiryIndex<V>>>,
    stats: Arc<CacheStats>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting TTL sweep task"
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = sweep_once(&index, &stats).await;
                    if removed > 0 {
                        info!("TTL sweep: removed {} expired entries", removed);
                    } else {
                        debug!("TTL sweep: no expired entries found");
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("TTL sweep task stopped");
    })
}

/// Runs one sweep under the write lock and returns the number of entries removed.
///
/// An integrity failure is logged and the sweep still counts; the next tick
/// runs as usual.
pub(crate) async fn sweep_once<V>(index: &RwLock<ExpiryIndex<V>>, stats: &CacheStats) -> usize {
    let mut guard = index.write().await;
    let removed = guard.sweep_expired(Instant::now());
    stats.record_sweep(removed);

    if cfg!(debug_assertions) {
        if let Err(err) = guard.validate() {
            warn!(error = %err, "Index integrity check failed after sweep");
        }
    }

    removed
}
