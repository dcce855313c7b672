use std::path::Path;
use swarmloc_core::conf::MonitorConfig;

/// Monitor settings scaled down so sessions finish in milliseconds.
pub fn test_config(log_dir: &Path) -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.log_dir = log_dir.to_path_buf();
    config.read_timeout_ms = 20;
    config.render_interval_ms = 50;
    config.shutdown_grace_ms = 500;
    config.start_stagger_ms = 0;
    config.identity.attempts = 10;
    config.identity.poll_interval_ms = 10;
    config
}
