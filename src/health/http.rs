//! HTTP health checker.
//!
//! Queries `GET <base>/ping` on the configured endpoint and decodes a JSON
//! body of the form `{"healthy": bool}`. One round trip per query, no
//! retries; the client carries a request timeout so a wedged endpoint
//! cannot hang a creation cycle indefinitely.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::interfaces::health::{HealthChecker, HealthError, HealthStatus, Result};

/// Health checker over HTTP.
pub struct HttpHealthChecker {
    client: Client,
    ping_url: String,
}

impl HttpHealthChecker {
    /// Create a checker for `base_url`, e.g. `http://localhost:5442`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HealthError::Http)?;

        Ok(Self {
            client,
            ping_url: format!("{}/ping", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl HealthChecker for HttpHealthChecker {
    async fn ping(&self) -> Result<HealthStatus> {
        let response = self.client.get(&self.ping_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HealthError::BadStatus(status));
        }

        let health: HealthStatus = response.json().await?;
        debug!(healthy = health.healthy, url = %self.ping_url, "health endpoint answered");
        Ok(health)
    }
}
