use crate::ingest::IdentityPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SwarmConfig {
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Tunables for a live monitoring session. Every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Directory that receives one log file per device.
    pub log_dir: PathBuf,

    /// Longest single wait for a device line before the stop signal is checked.
    pub read_timeout_ms: u64,

    /// Matrix cells older than this are not shown in the live view.
    pub staleness_window_ms: u64,

    pub render_interval_ms: u64,

    /// Capacity of the display queue; readers wait when it is full.
    pub queue_capacity: usize,

    /// How long the session waits for device tasks after stop is requested.
    pub shutdown_grace_ms: u64,

    /// Delay between starting consecutive devices.
    pub start_stagger_ms: u64,

    pub identity: IdentityConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            read_timeout_ms: 1000,
            staleness_window_ms: 5000,
            render_interval_ms: 2000,
            queue_capacity: 1024,
            shutdown_grace_ms: 3000,
            start_stagger_ms: 500,
            identity: IdentityConfig::default(),
        }
    }
}

impl MonitorConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn staleness_window(&self) -> Duration {
        Duration::from_millis(self.staleness_window_ms)
    }

    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    pub fn start_stagger(&self) -> Duration {
        Duration::from_millis(self.start_stagger_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    pub attempts: u32,
    pub poll_interval_ms: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        let policy = IdentityPolicy::default();
        Self {
            attempts: policy.attempts,
            poll_interval_ms: policy.poll_interval.as_millis() as u64,
        }
    }
}

impl IdentityConfig {
    pub fn policy(&self) -> IdentityPolicy {
        IdentityPolicy {
            attempts: self.attempts,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}
