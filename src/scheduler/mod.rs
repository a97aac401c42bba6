//! The daemon's two periodic cycles.
//!
//! This module contains:
//! - `creation`: fixed-period loop taking a health-gated snapshot per tick
//! - `retention`: fixed-delay loop pruning the oldest owned snapshots
//! - `TaskHandle`: cancellation + join handle for a spawned loop
//! - `Fault`: fatal sweeper conditions surfaced to the owning process
//!
//! The two timers are distinct constructs. Creation ticks at a constant
//! period and tolerates overlapping cycles; retention re-arms only after
//! the previous sweep fully completes, so at most one sweep is ever in
//! flight.

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub mod creation;
pub mod retention;

pub use creation::spawn_creation_task;
pub use retention::{spawn_retention_task, SweepError};

/// Handle to a running scheduler task.
pub struct TaskHandle {
    cancel: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TaskHandle {
    fn new(cancel: watch::Sender<bool>, join: JoinHandle<()>) -> Self {
        Self { cancel, join }
    }

    /// Signal the task to stop.
    pub fn stop(&self) {
        let _ = self.cancel.send(true);
    }

    /// Wait for the task to exit. Does not itself request a stop.
    pub async fn join(self) {
        let _ = self.join.await;
    }
}

/// Fatal sweeper condition surfaced to the owning process.
///
/// Delivered fire-and-forget over an unbounded channel; the core never
/// waits on the receiver. After sending one of these the retention loop has
/// already terminated for good.
#[derive(Debug)]
pub struct Fault {
    /// Dataset whose retention loop failed.
    pub dataset: String,
    /// What went wrong.
    pub error: SweepError,
}

/// Resolve when cancellation is requested (or the handle is gone).
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    loop {
        if *cancel.borrow() {
            return;
        }
        // A dropped sender means the handle is gone; treat it as a stop.
        if cancel.changed().await.is_err() {
            return;
        }
    }
}
