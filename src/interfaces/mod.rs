//! Trait interfaces consumed by the scheduler loops.
//!
//! These are the seams to the two external collaborators: the snapshot
//! store (the zfs binary in production) and the health endpoint that gates
//! snapshot creation. Mock implementations live next to the production
//! adapters in `storage` and `health`.

pub mod health;
pub mod snapshot_store;

pub use health::{HealthChecker, HealthError, HealthStatus};
pub use snapshot_store::{SnapshotStore, StoreError};
