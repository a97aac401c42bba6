//! Periodic snapshot creation.
//!
//! Cycle shape: check health (if an endpoint is configured), then create
//! `dataset@<now-millis>` or skip. Both a failed health query and an
//! unhealthy answer skip the cycle; a failed create is logged and
//! swallowed. Either way the next tick starts from scratch with a fresh
//! name, so transient failures self-heal without any state carried over.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{info, warn};

use super::{cancelled, TaskHandle};
use crate::config::Config;
use crate::interfaces::{HealthChecker, SnapshotStore};
use crate::naming::SnapshotId;

/// Spawn the creation loop.
///
/// The first cycle runs immediately; later cycles start on a fixed-period
/// timer regardless of how long the previous cycle took. Each cycle runs in
/// its own task, so a slow health check or create never delays the next
/// tick; overlapping cycles are safe because each derives a distinct
/// timestamp name.
pub fn spawn_creation_task(
    config: Config,
    store: Arc<dyn SnapshotStore>,
    health: Option<Arc<dyn HealthChecker>>,
) -> TaskHandle {
    let (cancel_tx, mut cancel_rx) = watch::channel(false);

    let join = tokio::spawn(async move {
        let mut ticks = tokio::time::interval(config.poll_interval());
        info!(
            dataset = %config.dataset,
            interval_ms = config.poll_interval_ms,
            "creation task started"
        );

        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    let config = config.clone();
                    let store = Arc::clone(&store);
                    let health = health.clone();
                    tokio::spawn(async move {
                        run_cycle(&config, store.as_ref(), health.as_deref()).await;
                    });
                }
                _ = cancelled(&mut cancel_rx) => {
                    info!(dataset = %config.dataset, "creation task stopped");
                    break;
                }
            }
        }
    });

    TaskHandle::new(cancel_tx, join)
}

/// One creation cycle: health-gate, then create-or-skip.
///
/// Never returns an error; every failure mode here is strictly
/// best-effort-and-retry-next-tick.
pub async fn run_cycle(
    config: &Config,
    store: &dyn SnapshotStore,
    health: Option<&dyn HealthChecker>,
) {
    if let Some(checker) = health {
        match checker.ping().await {
            Ok(status) if status.healthy => {}
            Ok(_) => {
                warn!(
                    dataset = %config.dataset,
                    "service reports unhealthy, not taking snapshot"
                );
                return;
            }
            Err(error) => {
                warn!(
                    dataset = %config.dataset,
                    error = %error,
                    "error fetching service status, not taking snapshot"
                );
                return;
            }
        }
    }

    let snapshot = SnapshotId::at(&config.dataset, Utc::now().timestamp_millis());
    info!(snapshot = %snapshot, "creating snapshot");

    if let Err(error) = store.create(&snapshot).await {
        warn!(
            snapshot = %snapshot,
            error = %error,
            "error while creating snapshot"
        );
    }
}
