//! Daemon configuration.
//!
//! Loaded once at startup from YAML files and environment variables;
//! immutable for the daemon's lifetime. Reconfiguration requires a restart.

use std::time::Duration;

use serde::Deserialize;

use crate::storage::zfs::DEFAULT_ZFS_PATH;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "SNAPKEEPER_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "SNAPKEEPER";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "SNAPKEEPER_LOG";

/// Default period of both the creation and retention cycles.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
/// Default number of owned snapshots to retain.
pub const DEFAULT_RETAIN_COUNT: usize = 10;
/// Default timeout for one health round trip.
pub const DEFAULT_HEALTH_TIMEOUT_MS: u64 = 5000;

/// Errors produced while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("dataset must be configured")]
    MissingDataset,

    #[error("poll_interval_ms must be greater than zero")]
    ZeroPollInterval,

    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
}

/// Main daemon configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The ZFS dataset to snapshot. Required.
    pub dataset: String,
    /// Period of both cycles, in milliseconds.
    pub poll_interval_ms: u64,
    /// Number of owned snapshots to keep; older ones are deleted.
    pub retain_count: usize,
    /// Base URL of the health endpoint gating creation. Optional; with no
    /// endpoint configured every cycle takes a snapshot.
    pub health_url: Option<String>,
    /// Timeout for one health round trip, in milliseconds.
    pub health_timeout_ms: u64,
    /// Path to the zfs binary.
    pub zfs_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: String::new(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            retain_count: DEFAULT_RETAIN_COUNT,
            health_url: None,
            health_timeout_ms: DEFAULT_HEALTH_TIMEOUT_MS,
            zfs_path: DEFAULT_ZFS_PATH.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `config.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `SNAPKEEPER_CONFIG` environment variable (if set)
    /// 4. Environment variables with `SNAPKEEPER` prefix
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the deserializer cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset.is_empty() {
            return Err(ConfigError::MissingDataset);
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }

    /// The cycle period as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// The health round-trip timeout as a [`Duration`].
    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }

    /// Create config for testing.
    pub fn for_test(dataset: &str) -> Self {
        Self {
            dataset: dataset.to_string(),
            ..Self::default()
        }
    }
}
