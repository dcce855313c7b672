use crate::conf::error::ConfigError;
use crate::conf::types::{MonitorConfig, SwarmConfig};
use std::fs;
use std::path::Path;

/// Read, parse and validate a configuration file.
pub fn load_config(path: &Path) -> Result<SwarmConfig, ConfigError> {
    let s = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let config = parse_config(&s).map_err(|e| ConfigError::parse(path, e))?;

    validate_config(&config)?;
    Ok(config)
}

/// Load `path` when given, otherwise fall back to the built-in defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<SwarmConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(SwarmConfig::default()),
    }
}

pub fn parse_config(s: &str) -> Result<SwarmConfig, hcl::Error> {
    hcl::from_str(s)
}

pub fn validate_config(config: &SwarmConfig) -> Result<(), ConfigError> {
    validate_monitor(&config.monitor)
}

fn validate_monitor(monitor: &MonitorConfig) -> Result<(), ConfigError> {
    let non_zero = [
        ("monitor.read_timeout_ms", monitor.read_timeout_ms),
        ("monitor.staleness_window_ms", monitor.staleness_window_ms),
        ("monitor.render_interval_ms", monitor.render_interval_ms),
        ("monitor.queue_capacity", monitor.queue_capacity as u64),
        ("monitor.identity.attempts", u64::from(monitor.identity.attempts)),
        (
            "monitor.identity.poll_interval_ms",
            monitor.identity.poll_interval_ms,
        ),
    ];

    for (field, value) in non_zero {
        if value == 0 {
            return Err(ConfigError::invalid(field, "must be greater than zero"));
        }
    }

    if monitor.log_dir.as_os_str().is_empty() {
        return Err(ConfigError::invalid("monitor.log_dir", "must not be empty"));
    }

    Ok(())
}
