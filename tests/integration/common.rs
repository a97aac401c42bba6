//! Shared helpers for integration scenarios.

use std::time::Duration;

use snapkeeper::config::Config;

/// Deadline for every poll loop in these scenarios.
pub const WAIT: Duration = Duration::from_secs(2);
/// Pause between polls.
pub const TICK: Duration = Duration::from_millis(5);

/// Config with a short cycle period so scenarios finish quickly.
pub fn fast_config(dataset: &str, retain_count: usize) -> Config {
    Config {
        poll_interval_ms: 10,
        retain_count,
        ..Config::for_test(dataset)
    }
}
