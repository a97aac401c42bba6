//! Mock snapshot store implementation for testing.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::interfaces::snapshot_store::{Result, SnapshotStore, StoreError};
use crate::naming::SnapshotId;

/// In-memory snapshot store for testing.
///
/// Holds raw listing entries; `list` returns them sorted ascending by name
/// the way zfs does. Individual destroys can be made to fail by name, and
/// create/list can be failed wholesale.
#[derive(Default)]
pub struct MockSnapshotStore {
    entries: RwLock<Vec<String>>,
    created: RwLock<Vec<SnapshotId>>,
    destroyed: RwLock<Vec<SnapshotId>>,
    destroy_attempts: RwLock<Vec<SnapshotId>>,
    list_calls: RwLock<usize>,
    fail_on_create: RwLock<bool>,
    fail_on_list: RwLock<bool>,
    fail_destroy_of: RwLock<HashSet<String>>,
}

impl MockSnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with raw listing entries.
    pub fn with_entries(entries: &[&str]) -> Self {
        Self {
            entries: RwLock::new(entries.iter().map(|e| e.to_string()).collect()),
            ..Self::default()
        }
    }

    /// Replace the seeded entries.
    pub async fn seed(&self, entries: &[&str]) {
        *self.entries.write().await = entries.iter().map(|e| e.to_string()).collect();
    }

    pub async fn set_fail_on_create(&self, fail: bool) {
        *self.fail_on_create.write().await = fail;
    }

    pub async fn set_fail_on_list(&self, fail: bool) {
        *self.fail_on_list.write().await = fail;
    }

    /// Make destroy fail for the snapshot with this name.
    pub async fn fail_destroy_of(&self, name: &str) {
        self.fail_destroy_of.write().await.insert(name.to_string());
    }

    pub async fn entries(&self) -> Vec<String> {
        let mut entries = self.entries.read().await.clone();
        entries.sort();
        entries
    }

    pub async fn created(&self) -> Vec<SnapshotId> {
        self.created.read().await.clone()
    }

    pub async fn destroyed(&self) -> Vec<SnapshotId> {
        self.destroyed.read().await.clone()
    }

    /// Every destroy call seen, successful or not.
    pub async fn destroy_attempts(&self) -> Vec<SnapshotId> {
        self.destroy_attempts.read().await.clone()
    }

    pub async fn list_calls(&self) -> usize {
        *self.list_calls.read().await
    }
}

#[async_trait]
impl SnapshotStore for MockSnapshotStore {
    async fn create(&self, snapshot: &SnapshotId) -> Result<()> {
        if *self.fail_on_create.read().await {
            return Err(StoreError::Backend("mock create failure".to_string()));
        }
        self.entries.write().await.push(snapshot.to_string());
        self.created.write().await.push(snapshot.clone());
        Ok(())
    }

    async fn list(&self, _dataset: &str) -> Result<Vec<String>> {
        *self.list_calls.write().await += 1;
        if *self.fail_on_list.read().await {
            return Err(StoreError::Backend("mock list failure".to_string()));
        }
        Ok(self.entries().await)
    }

    async fn destroy(&self, snapshot: &SnapshotId) -> Result<()> {
        self.destroy_attempts.write().await.push(snapshot.clone());
        if self.fail_destroy_of.read().await.contains(snapshot.name()) {
            return Err(StoreError::Backend(format!(
                "mock destroy failure for {snapshot}"
            )));
        }
        let rendered = snapshot.to_string();
        self.entries.write().await.retain(|e| *e != rendered);
        self.destroyed.write().await.push(snapshot.clone());
        Ok(())
    }
}
