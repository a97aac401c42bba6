//! Daemon assembly and lifecycle.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::config::Config;
use crate::interfaces::{HealthChecker, SnapshotStore};
use crate::scheduler::{spawn_creation_task, spawn_retention_task, Fault, TaskHandle};

/// A running snapshot daemon: both scheduler loops plus the fault channel.
///
/// The two loops are independent. Creation keeps running even after the
/// retention loop has reported a fault and died; whether that warrants a
/// process exit is the caller's decision, not this type's.
pub struct SnapshotDaemon {
    creation: TaskHandle,
    retention: TaskHandle,
    faults: mpsc::UnboundedReceiver<Fault>,
}

impl SnapshotDaemon {
    /// Start both loops for the given dataset configuration.
    pub fn start(
        config: Config,
        store: Arc<dyn SnapshotStore>,
        health: Option<Arc<dyn HealthChecker>>,
    ) -> Self {
        info!(
            dataset = %config.dataset,
            retain_count = config.retain_count,
            interval_ms = config.poll_interval_ms,
            health = config.health_url.as_deref().unwrap_or("none"),
            "starting snapshot daemon"
        );

        let (fault_tx, fault_rx) = mpsc::unbounded_channel();

        let creation = spawn_creation_task(config.clone(), Arc::clone(&store), health);
        let retention = spawn_retention_task(config, store, fault_tx);

        Self {
            creation,
            retention,
            faults: fault_rx,
        }
    }

    /// Wait for the next fatal condition.
    ///
    /// Resolves `None` once the daemon has shut down and no further faults
    /// can arrive.
    pub async fn next_fault(&mut self) -> Option<Fault> {
        self.faults.recv().await
    }

    /// Stop both loops and wait for them to exit.
    ///
    /// Creation cycles already in flight are not awaited; they were spawned
    /// detached and expire on their own.
    pub async fn shutdown(self) {
        self.creation.stop();
        self.retention.stop();
        self.creation.join().await;
        self.retention.join().await;
        info!("snapshot daemon stopped");
    }
}
