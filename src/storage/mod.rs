//! Snapshot store implementations.

pub mod mock;
pub mod zfs;

pub use mock::MockSnapshotStore;
pub use zfs::ZfsSnapshotStore;
