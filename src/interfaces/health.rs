//! External health oracle interface.

use async_trait::async_trait;
use serde::Deserialize;

/// Result type for health queries.
pub type Result<T> = std::result::Result<T, HealthError>;

/// Errors that can occur while querying the health endpoint.
///
/// All of them mean the same thing to the creation scheduler: skip this
/// cycle. They are never escalated further.
#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("health request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("health endpoint returned {0}")]
    BadStatus(reqwest::StatusCode),

    #[error("health checker unavailable: {0}")]
    Unavailable(String),
}

/// Health endpoint response body.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HealthStatus {
    /// Whether the guarded service considers itself healthy.
    pub healthy: bool,
}

/// Interface for the health check gating snapshot creation.
///
/// One non-blocking round trip, no retries. A failed query and an unhealthy
/// answer are treated identically by the caller.
#[async_trait]
pub trait HealthChecker: Send + Sync {
    /// Query the endpoint once.
    async fn ping(&self) -> Result<HealthStatus>;
}
