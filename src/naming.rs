//! Snapshot naming convention.
//!
//! A daemon-owned snapshot is named with its creation time as milliseconds
//! since the Unix epoch: a 13-digit decimal string like `1405378955344`.
//! Listing output may also contain snapshots created by operators or backup
//! tooling under arbitrary names; anything that does not match the 13-digit
//! pattern is treated as foreign and never counted or deleted.

use std::fmt;

/// Digit count of an owned snapshot name. Millisecond timestamps render at
/// this width between roughly 2001 and 2286.
pub const OWNED_NAME_LEN: usize = 13;

/// Format a snapshot name from a millisecond timestamp.
///
/// Natural decimal formatting, no padding. Staying inside the 13-digit range
/// is the caller's timing assumption, not enforced here; [`is_owned`] is the
/// gate that decides what retention may touch.
pub fn snapshot_name(timestamp_millis: i64) -> String {
    timestamp_millis.to_string()
}

/// Whether a raw listing entry (`<dataset>@<name>`) names a snapshot this
/// daemon owns.
///
/// True iff the component after the `@` is exactly 13 ASCII digits. Entries
/// rejected here are excluded from all retention processing.
pub fn is_owned(entry: &str) -> bool {
    owned_name(entry).is_some()
}

/// Extract the owned snapshot name from a raw listing entry, if any.
fn owned_name(entry: &str) -> Option<&str> {
    let (_, name) = entry.split_once('@')?;
    if name.len() == OWNED_NAME_LEN && name.bytes().all(|b| b.is_ascii_digit()) {
        Some(name)
    } else {
        None
    }
}

/// Fully-qualified snapshot identifier: `<dataset>@<name>`.
///
/// Created by the creation scheduler at submission time and destroyed by the
/// retention sweeper; immutable in between.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SnapshotId {
    dataset: String,
    name: String,
}

impl SnapshotId {
    /// Identifier for a new snapshot of `dataset` taken at `timestamp_millis`.
    pub fn at(dataset: &str, timestamp_millis: i64) -> Self {
        Self {
            dataset: dataset.to_string(),
            name: snapshot_name(timestamp_millis),
        }
    }

    /// Parse a raw listing entry, accepting only daemon-owned snapshots.
    ///
    /// Returns `None` for foreign entries so they can never become deletion
    /// candidates.
    pub fn parse_owned(entry: &str) -> Option<Self> {
        let name = owned_name(entry)?;
        let (dataset, _) = entry.split_once('@')?;
        Some(Self {
            dataset: dataset.to_string(),
            name: name.to_string(),
        })
    }

    /// The dataset component.
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// The snapshot name component.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.dataset, self.name)
    }
}
