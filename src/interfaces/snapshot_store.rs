//! Snapshot storage interface.

use std::process::ExitStatus;

use async_trait::async_trait;

use crate::naming::SnapshotId;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to execute `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("snapshot listing was not valid UTF-8: {0}")]
    InvalidListing(#[from] std::string::FromUtf8Error),

    #[error("store failure: {0}")]
    Backend(String),
}

/// Interface for snapshot create/list/destroy against a named dataset.
///
/// The store is assumed to safely handle concurrent operations on the same
/// dataset; callers rely on distinct identifiers, not mutual exclusion.
///
/// Implementations:
/// - `ZfsSnapshotStore`: shells out to the zfs binary
/// - `MockSnapshotStore`: in-memory mock for testing
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Create the named snapshot.
    async fn create(&self, snapshot: &SnapshotId) -> Result<()>;

    /// List raw snapshot entries for a dataset, ascending by name.
    ///
    /// One `<dataset>@<name>` per element. Entries are returned unfiltered;
    /// deciding which of them the daemon owns is the naming codec's job.
    async fn list(&self, dataset: &str) -> Result<Vec<String>>;

    /// Destroy the named snapshot.
    async fn destroy(&self, snapshot: &SnapshotId) -> Result<()>;
}
