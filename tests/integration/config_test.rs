//! Configuration loading scenarios.
//!
//! These mutate process environment, so they are serialized.

use serial_test::serial;

use snapkeeper::config::{Config, ConfigError};

#[test]
#[serial]
fn test_load_from_yaml_file() {
    let dir = std::env::temp_dir().join("snapkeeper-config-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.yaml");
    std::fs::write(
        &path,
        "dataset: zones/pg/data\npoll_interval_ms: 30000\nhealth_url: http://localhost:5442\n",
    )
    .unwrap();

    let config = Config::load(path.to_str()).unwrap();

    assert_eq!(config.dataset, "zones/pg/data");
    assert_eq!(config.poll_interval_ms, 30000);
    assert_eq!(config.health_url.as_deref(), Some("http://localhost:5442"));
    // Unspecified values keep their defaults.
    assert_eq!(config.retain_count, 10);
    assert_eq!(config.zfs_path, "/usr/sbin/zfs");
}

#[test]
#[serial]
fn test_env_overrides() {
    std::env::set_var("SNAPKEEPER__DATASET", "tank/db");
    std::env::set_var("SNAPKEEPER__RETAIN_COUNT", "5");

    let config = Config::load(None).unwrap();

    std::env::remove_var("SNAPKEEPER__DATASET");
    std::env::remove_var("SNAPKEEPER__RETAIN_COUNT");

    assert_eq!(config.dataset, "tank/db");
    assert_eq!(config.retain_count, 5);
}

#[test]
#[serial]
fn test_load_without_dataset_fails() {
    let result = Config::load(None);
    assert!(matches!(result, Err(ConfigError::MissingDataset)));
}
