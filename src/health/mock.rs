//! Mock health checker implementation for testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::interfaces::health::{HealthChecker, HealthError, HealthStatus, Result};

/// Mock health checker with a settable answer.
pub struct MockHealthChecker {
    healthy: RwLock<bool>,
    fail_on_ping: RwLock<bool>,
    pings: AtomicUsize,
}

impl Default for MockHealthChecker {
    fn default() -> Self {
        Self {
            healthy: RwLock::new(true),
            fail_on_ping: RwLock::new(false),
            pings: AtomicUsize::new(0),
        }
    }
}

impl MockHealthChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_healthy(&self, healthy: bool) {
        *self.healthy.write().await = healthy;
    }

    pub async fn set_fail_on_ping(&self, fail: bool) {
        *self.fail_on_ping.write().await = fail;
    }

    pub fn ping_count(&self) -> usize {
        self.pings.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthChecker for MockHealthChecker {
    async fn ping(&self) -> Result<HealthStatus> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        if *self.fail_on_ping.read().await {
            return Err(HealthError::Unavailable("mock ping failure".to_string()));
        }
        Ok(HealthStatus {
            healthy: *self.healthy.read().await,
        })
    }
}
