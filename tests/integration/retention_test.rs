//! Retention loop scenarios.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use snapkeeper::scheduler::{spawn_retention_task, SweepError};
use snapkeeper::storage::MockSnapshotStore;

use super::common::{fast_config, TICK, WAIT};

#[tokio::test]
async fn test_retention_prunes_to_threshold() {
    let store = Arc::new(MockSnapshotStore::with_entries(&[
        "pg@1000000000000",
        "pg@1000000000001",
        "pg@1000000000002",
    ]));
    let (fault_tx, _fault_rx) = mpsc::unbounded_channel();

    let handle = spawn_retention_task(fast_config("pg", 2), Arc::clone(&store) as _, fault_tx);

    timeout(WAIT, async {
        while store.destroyed().await.is_empty() {
            sleep(TICK).await;
        }
    })
    .await
    .expect("timed out waiting for the oldest snapshot to be deleted");

    assert_eq!(store.destroyed().await[0].to_string(), "pg@1000000000000");
    assert_eq!(
        store.entries().await,
        vec!["pg@1000000000001", "pg@1000000000002"]
    );

    handle.stop();
    handle.join().await;
}

#[tokio::test]
async fn test_retention_ignores_operator_snapshots() {
    // The manual snapshot neither counts toward the threshold nor becomes a
    // deletion candidate: only two owned snapshots, both within retention.
    let store = Arc::new(MockSnapshotStore::with_entries(&[
        "pg@1000000000000",
        "pg@1000000000001",
        "pg@manual-backup",
    ]));
    let (fault_tx, _fault_rx) = mpsc::unbounded_channel();

    let handle = spawn_retention_task(fast_config("pg", 2), Arc::clone(&store) as _, fault_tx);

    timeout(WAIT, async {
        while store.list_calls().await < 3 {
            sleep(TICK).await;
        }
    })
    .await
    .expect("timed out waiting for several sweeps");

    assert!(store.destroy_attempts().await.is_empty());
    assert_eq!(store.entries().await.len(), 3);

    handle.stop();
    handle.join().await;
}

#[tokio::test]
async fn test_retention_rearms_after_successful_sweeps() {
    let store = Arc::new(MockSnapshotStore::new());
    let (fault_tx, _fault_rx) = mpsc::unbounded_channel();

    let handle = spawn_retention_task(fast_config("pg", 10), Arc::clone(&store) as _, fault_tx);

    timeout(WAIT, async {
        while store.list_calls().await < 3 {
            sleep(TICK).await;
        }
    })
    .await
    .expect("timed out waiting for repeated sweeps");

    handle.stop();
    handle.join().await;
}

#[tokio::test]
async fn test_listing_failure_halts_loop_permanently() {
    let store = Arc::new(MockSnapshotStore::new());
    store.set_fail_on_list(true).await;
    let (fault_tx, mut fault_rx) = mpsc::unbounded_channel();

    let handle = spawn_retention_task(fast_config("pg", 2), Arc::clone(&store) as _, fault_tx);

    let fault = fault_rx.recv().await.expect("fault should be reported");
    assert_eq!(fault.dataset, "pg");
    assert!(matches!(fault.error, SweepError::List { .. }));

    // The loop is dead: no further listings however long we wait.
    assert_eq!(store.list_calls().await, 1);
    sleep(Duration::from_millis(100)).await;
    assert_eq!(store.list_calls().await, 1);

    handle.join().await;
}

#[tokio::test]
async fn test_destroy_failure_halts_loop_permanently() {
    let store = Arc::new(MockSnapshotStore::with_entries(&[
        "pg@1000000000000",
        "pg@1000000000001",
        "pg@1000000000002",
    ]));
    store.fail_destroy_of("1000000000000").await;
    let (fault_tx, mut fault_rx) = mpsc::unbounded_channel();

    let handle = spawn_retention_task(fast_config("pg", 2), Arc::clone(&store) as _, fault_tx);

    let fault = fault_rx.recv().await.expect("fault should be reported");
    match fault.error {
        SweepError::Destroy { snapshot, .. } => {
            assert_eq!(snapshot.to_string(), "pg@1000000000000");
        }
        other => panic!("expected destroy failure, got {other}"),
    }

    sleep(Duration::from_millis(100)).await;
    assert_eq!(store.list_calls().await, 1);

    handle.join().await;
}
