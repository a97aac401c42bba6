//! Snapshot retention sweeps.
//!
//! Cycle shape: list everything under the dataset, keep only entries that
//! match the daemon's naming convention, sort oldest-first, and delete the
//! surplus beyond the configured retention count - all surplus snapshots
//! concurrently. The loop is fixed-delay: the next sweep is armed only
//! after the current one fully completes, and a failed sweep does not
//! re-arm at all - retention stays down until the process restarts. See
//! DESIGN.md before changing the halt-on-failure behavior.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::{cancelled, Fault, TaskHandle};
use crate::config::Config;
use crate::interfaces::{SnapshotStore, StoreError};
use crate::naming::SnapshotId;

/// Errors that terminate a sweep (and with it the retention loop).
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("unable to list snapshots of {dataset}: {source}")]
    List {
        dataset: String,
        #[source]
        source: StoreError,
    },

    #[error("unable to destroy {snapshot}: {source}")]
    Destroy {
        snapshot: SnapshotId,
        #[source]
        source: StoreError,
    },

    #[error("snapshot destroy task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Spawn the retention loop.
///
/// The first sweep runs immediately. After a successful sweep the next one
/// is scheduled a full poll interval later, measured from completion, so
/// sweeps never overlap. A failed sweep reports a [`Fault`] and terminates
/// the loop permanently.
pub fn spawn_retention_task(
    config: Config,
    store: Arc<dyn SnapshotStore>,
    faults: mpsc::UnboundedSender<Fault>,
) -> TaskHandle {
    let (cancel_tx, mut cancel_rx) = watch::channel(false);

    let join = tokio::spawn(async move {
        info!(
            dataset = %config.dataset,
            retain_count = config.retain_count,
            "retention task started"
        );

        loop {
            tokio::select! {
                result = run_sweep(&config, &store) => {
                    if let Err(error) = result {
                        error!(
                            dataset = %config.dataset,
                            error = %error,
                            "unable to maintain snapshots"
                        );
                        let _ = faults.send(Fault {
                            dataset: config.dataset.clone(),
                            error,
                        });
                        break;
                    }
                }
                _ = cancelled(&mut cancel_rx) => break,
            }

            tokio::select! {
                _ = tokio::time::sleep(config.poll_interval()) => {}
                _ = cancelled(&mut cancel_rx) => break,
            }
        }

        info!(dataset = %config.dataset, "retention task stopped");
    });

    TaskHandle::new(cancel_tx, join)
}

/// One sweep: list, filter, select the surplus oldest, delete them.
pub async fn run_sweep(config: &Config, store: &Arc<dyn SnapshotStore>) -> Result<(), SweepError> {
    let entries = store
        .list(&config.dataset)
        .await
        .map_err(|source| SweepError::List {
            dataset: config.dataset.clone(),
            source,
        })?;
    debug!(dataset = %config.dataset, entries = entries.len(), "got snapshots");

    let mut batch = owned_batch(&entries);
    let surplus = batch.len().saturating_sub(config.retain_count);
    if surplus == 0 {
        debug!(
            dataset = %config.dataset,
            count = batch.len(),
            "owned snapshot count within threshold"
        );
        return Ok(());
    }

    info!(
        dataset = %config.dataset,
        count = batch.len(),
        threshold = config.retain_count,
        "deleting snapshots as count exceeds threshold"
    );

    let expired: Vec<SnapshotId> = batch.drain(..surplus).collect();
    destroy_all(store, expired).await
}

/// Filter a raw listing down to owned snapshots, oldest first.
///
/// Foreign entries (operator snapshots, backup tooling) drop out here and
/// are invisible to everything downstream: they are never deleted and never
/// counted toward the retention threshold.
pub fn owned_batch(entries: &[String]) -> Vec<SnapshotId> {
    let mut batch: Vec<SnapshotId> = entries
        .iter()
        .filter_map(|entry| SnapshotId::parse_owned(entry))
        .collect();
    batch.sort();
    batch
}

type DestroyTask = JoinHandle<(SnapshotId, Result<(), StoreError>)>;

/// Destroy all expired snapshots concurrently.
///
/// Completion fires exactly once: `Ok` when every deletion succeeded, or
/// the first failure observed. Siblings still in flight when a failure is
/// seen are not cancelled - they finish in the background and their late
/// outcomes are only logged.
async fn destroy_all(
    store: &Arc<dyn SnapshotStore>,
    expired: Vec<SnapshotId>,
) -> Result<(), SweepError> {
    let mut in_flight: FuturesUnordered<DestroyTask> = expired
        .into_iter()
        .map(|snapshot| {
            let store = Arc::clone(store);
            tokio::spawn(async move {
                let result = store.destroy(&snapshot).await;
                (snapshot, result)
            })
        })
        .collect();

    while let Some(joined) = in_flight.next().await {
        match joined {
            Ok((snapshot, Ok(()))) => {
                info!(snapshot = %snapshot, "destroyed snapshot");
            }
            Ok((snapshot, Err(source))) => {
                error!(snapshot = %snapshot, error = %source, "unable to destroy snapshot");
                drain_remaining(in_flight);
                return Err(SweepError::Destroy { snapshot, source });
            }
            Err(join_error) => {
                error!(error = %join_error, "snapshot destroy task aborted");
                drain_remaining(in_flight);
                return Err(SweepError::Join(join_error));
            }
        }
    }

    Ok(())
}

/// Log the outcomes of deletions that were still in flight when the sweep
/// already failed.
fn drain_remaining(mut in_flight: FuturesUnordered<DestroyTask>) {
    if in_flight.is_empty() {
        return;
    }
    tokio::spawn(async move {
        while let Some(joined) = in_flight.next().await {
            match joined {
                Ok((snapshot, Ok(()))) => {
                    info!(snapshot = %snapshot, "destroyed snapshot");
                }
                Ok((snapshot, Err(error))) => {
                    warn!(snapshot = %snapshot, error = %error, "unable to destroy snapshot");
                }
                Err(join_error) => {
                    warn!(error = %join_error, "snapshot destroy task aborted");
                }
            }
        }
    });
}
