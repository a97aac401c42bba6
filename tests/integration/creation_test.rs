//! Creation loop scenarios.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use snapkeeper::health::MockHealthChecker;
use snapkeeper::interfaces::HealthChecker;
use snapkeeper::scheduler::spawn_creation_task;
use snapkeeper::storage::MockSnapshotStore;

use super::common::{fast_config, TICK, WAIT};

#[tokio::test]
async fn test_creation_loop_takes_periodic_snapshots() {
    let store = Arc::new(MockSnapshotStore::new());

    let handle = spawn_creation_task(fast_config("pg", 10), Arc::clone(&store) as _, None);

    timeout(WAIT, async {
        while store.created().await.len() < 3 {
            sleep(TICK).await;
        }
    })
    .await
    .expect("timed out waiting for three snapshots");

    handle.stop();
    handle.join().await;
}

#[tokio::test]
async fn test_creation_loop_survives_store_failures() {
    let store = Arc::new(MockSnapshotStore::new());
    store.set_fail_on_create(true).await;

    let handle = spawn_creation_task(fast_config("pg", 10), Arc::clone(&store) as _, None);

    // Let several failing cycles elapse; the loop must keep ticking.
    sleep(Duration::from_millis(60)).await;
    assert!(store.created().await.is_empty());

    store.set_fail_on_create(false).await;
    timeout(WAIT, async {
        while store.created().await.is_empty() {
            sleep(TICK).await;
        }
    })
    .await
    .expect("timed out waiting for a snapshot after the store recovered");

    handle.stop();
    handle.join().await;
}

#[tokio::test]
async fn test_creation_loop_skips_while_unhealthy() {
    let store = Arc::new(MockSnapshotStore::new());
    let health = Arc::new(MockHealthChecker::new());
    health.set_healthy(false).await;

    let handle = spawn_creation_task(
        fast_config("pg", 10),
        Arc::clone(&store) as _,
        Some(Arc::clone(&health) as Arc<dyn HealthChecker>),
    );

    // Each cycle queries health and skips; none create.
    timeout(WAIT, async {
        while health.ping_count() < 3 {
            sleep(TICK).await;
        }
    })
    .await
    .expect("timed out waiting for health queries");
    assert!(store.created().await.is_empty());

    health.set_healthy(true).await;
    timeout(WAIT, async {
        while store.created().await.is_empty() {
            sleep(TICK).await;
        }
    })
    .await
    .expect("timed out waiting for a snapshot once healthy again");

    handle.stop();
    handle.join().await;
}
