//! Entity Cache sweeper daemon
//!
//! Connects to the shared Redis store and sweeps expired entries on an
//! interval, so that clients writing TTL'd keys need not run their own sweep.

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use entity_cache::{Config, RedisCacheAdapter};

/// Main entry point for the sweeper daemon.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect to Redis and start the expiry sweep
/// 4. Run until SIGINT/SIGTERM, then stop the sweep and report stats
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "entity_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Entity Cache sweeper");

    let config = Config::from_env();
    info!(
        "Configuration loaded: redis_url={}, sweep_interval={}ms",
        config.redis_url, config.sweep_interval_ms
    );

    let cache = RedisCacheAdapter::redis(config.redis_url.clone(), config.sweep_interval());
    cache
        .wait_ready()
        .await
        .with_context(|| format!("could not connect to {}", config.redis_url))?;
    info!("Sweeping every {}ms", config.sweep_interval_ms);

    shutdown_signal().await?;

    cache.shutdown();
    let stats = cache.sweep_stats().await;
    info!(
        "Sweeper stopped: runs={}, expired={}, failures={} ({:.2} per run)",
        stats.runs,
        stats.expired,
        stats.failures,
        stats.failure_rate()
    );
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() -> anyhow::Result<()> {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .context("failed to install Ctrl+C handler")
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<(), anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<anyhow::Result<()>>();

    tokio::select! {
        result = ctrl_c => {
            result?;
            info!("Received Ctrl+C, initiating shutdown...");
        }
        result = terminate => {
            result?;
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
    Ok(())
}
