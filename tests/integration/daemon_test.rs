//! Whole-daemon scenarios: both loops running against one store.

use std::sync::Arc;

use tokio::time::{sleep, timeout};

use snapkeeper::daemon::SnapshotDaemon;
use snapkeeper::health::MockHealthChecker;
use snapkeeper::interfaces::HealthChecker;
use snapkeeper::scheduler::SweepError;
use snapkeeper::storage::MockSnapshotStore;

use super::common::{fast_config, TICK, WAIT};

#[tokio::test]
async fn test_daemon_creates_and_prunes() {
    let store = Arc::new(MockSnapshotStore::with_entries(&[
        "pg@1000000000000",
        "pg@1000000000001",
        "pg@1000000000002",
        "pg@manual-backup",
    ]));
    let health = Arc::new(MockHealthChecker::new());

    let daemon = SnapshotDaemon::start(
        fast_config("pg", 2),
        Arc::clone(&store) as _,
        Some(Arc::clone(&health) as Arc<dyn HealthChecker>),
    );

    timeout(WAIT, async {
        loop {
            let pruned = store
                .destroyed()
                .await
                .iter()
                .any(|id| id.to_string() == "pg@1000000000000");
            if pruned && !store.created().await.is_empty() {
                break;
            }
            sleep(TICK).await;
        }
    })
    .await
    .expect("timed out waiting for the daemon to create and prune");

    // Operator snapshot untouched throughout.
    assert!(store
        .entries()
        .await
        .contains(&"pg@manual-backup".to_string()));
    assert!(health.ping_count() >= 1);

    daemon.shutdown().await;
}

#[tokio::test]
async fn test_daemon_fault_leaves_creation_running() {
    let store = Arc::new(MockSnapshotStore::new());
    store.set_fail_on_list(true).await;

    let mut daemon = SnapshotDaemon::start(fast_config("pg", 2), Arc::clone(&store) as _, None);

    let fault = daemon.next_fault().await.expect("fault should be reported");
    assert!(matches!(fault.error, SweepError::List { .. }));

    // Retention is dead, creation is not: snapshots keep appearing.
    let seen = store.created().await.len();
    timeout(WAIT, async {
        while store.created().await.len() <= seen {
            sleep(TICK).await;
        }
    })
    .await
    .expect("timed out waiting for creation to continue past the fault");
    assert_eq!(store.list_calls().await, 1);

    daemon.shutdown().await;
}
