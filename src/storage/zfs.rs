//! Snapshot store backed by the zfs command line tool.
//!
//! Every operation is one invocation of the zfs binary with captured
//! output. No shell interpretation - direct exec. The adapter never
//! interprets snapshot names; filtering listing output is the naming
//! codec's job.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::interfaces::snapshot_store::{Result, SnapshotStore, StoreError};
use crate::naming::SnapshotId;

/// Default location of the zfs binary.
pub const DEFAULT_ZFS_PATH: &str = "/usr/sbin/zfs";

/// Snapshot store shelling out to zfs.
pub struct ZfsSnapshotStore {
    zfs_path: String,
}

impl ZfsSnapshotStore {
    /// Create a store using the zfs binary at `zfs_path`.
    pub fn new(zfs_path: impl Into<String>) -> Self {
        Self {
            zfs_path: zfs_path.into(),
        }
    }

    /// Run the zfs binary with `args`, returning captured stdout.
    ///
    /// A non-zero exit status becomes [`StoreError::CommandFailed`] carrying
    /// the command line and trimmed stderr.
    async fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        let command = format!("{} {}", self.zfs_path, args.join(" "));
        debug!(command = %command, "running zfs");

        let output = Command::new(&self.zfs_path)
            .args(args)
            .output()
            .await
            .map_err(|source| StoreError::Io {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(StoreError::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl SnapshotStore for ZfsSnapshotStore {
    async fn create(&self, snapshot: &SnapshotId) -> Result<()> {
        self.run(&["snapshot", &snapshot.to_string()]).await?;
        Ok(())
    }

    async fn list(&self, dataset: &str) -> Result<Vec<String>> {
        // -H drops headers, -d 1 stays at this dataset, -s name sorts
        // ascending so the oldest owned snapshot comes first.
        let stdout = self
            .run(&[
                "list", "-t", "snapshot", "-H", "-d", "1", "-s", "name", "-o", "name", dataset,
            ])
            .await?;

        let stdout = String::from_utf8(stdout)?;
        Ok(stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn destroy(&self, snapshot: &SnapshotId) -> Result<()> {
        self.run(&["destroy", &snapshot.to_string()]).await?;
        Ok(())
    }
}
