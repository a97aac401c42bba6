//! snapkeeper: bounded ZFS snapshot daemon
//!
//! Takes a snapshot of the configured dataset every poll interval (unless
//! the optional health endpoint says the guarded service is unhealthy) and
//! prunes the oldest daemon-owned snapshots once their count exceeds the
//! retention threshold.
//!
//! ## Configuration
//! Loaded from `config.yaml`, an optional path argument, the file named by
//! `SNAPKEEPER_CONFIG`, and `SNAPKEEPER`-prefixed environment variables.
//! - dataset: ZFS dataset to snapshot (required)
//! - poll_interval_ms: cycle period (default: 1000)
//! - retain_count: owned snapshots to keep (default: 10)
//! - health_url: health endpoint gating creation (optional)
//! - zfs_path: zfs binary (default: /usr/sbin/zfs)
//!
//! Logging is configured via `SNAPKEEPER_LOG` (tracing env-filter syntax).

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snapkeeper::config::{Config, LOG_ENV_VAR};
use snapkeeper::daemon::SnapshotDaemon;
use snapkeeper::health::HttpHealthChecker;
use snapkeeper::interfaces::HealthChecker;
use snapkeeper::storage::ZfsSnapshotStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::args().nth(1);
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!("failed to load configuration: {}", e);
        e
    })?;

    let store = Arc::new(ZfsSnapshotStore::new(&config.zfs_path));

    let health: Option<Arc<dyn HealthChecker>> = match &config.health_url {
        Some(url) => {
            info!(url = %url, "health endpoint configured, creation will be gated on it");
            Some(Arc::new(HttpHealthChecker::new(
                url,
                config.health_timeout(),
            )?))
        }
        None => {
            info!("no health endpoint configured, creation is ungated");
            None
        }
    };

    let mut daemon = SnapshotDaemon::start(config, store, health);

    let fault = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            None
        }
        fault = daemon.next_fault() => fault,
    };

    daemon.shutdown().await;

    match fault {
        Some(fault) => {
            error!(
                dataset = %fault.dataset,
                error = %fault.error,
                "retention failed permanently, exiting"
            );
            Err(fault.error.into())
        }
        None => Ok(()),
    }
}
