//! TTL Cache demo
//!
//! Stores a key with a five second TTL, re-arms it once, and reports what a
//! reader sees every second until the key has expired and been swept.

use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_cache::{Config, TtlCache};

/// Seconds the demo keeps polling the key.
const DEMO_SECONDS: u64 = 15;

/// Second at which the key is re-armed with a new value.
const REARM_AT: u64 = 3;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: sweep_interval={}ms",
        config.sweep_interval.as_millis()
    );

    let cache = TtlCache::with_config(config)?;
    let ttl = Duration::from_secs(5);

    cache.set("key", "val".to_string(), ttl).await;
    let value = cache.get("key").await;
    info!(?value, "t=0s");

    for second in 0..DEMO_SECONDS {
        tokio::time::sleep(Duration::from_secs(1)).await;
        if second == REARM_AT {
            cache.set("key", "val2".to_string(), ttl).await;
            info!("Re-armed key with val2");
        }

        let value = cache.get("key").await;
        let indexed = cache.len().await;
        info!(?value, indexed, "t={}s", second + 1);
    }

    info!("Stats: {}", serde_json::to_string(&cache.stats())?);

    cache.shutdown().await?;
    Ok(())
}
