use crate::monitor::sink::SinkClosed;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single device task stopped early. Other devices keep running.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to open device {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read from device {device}: {source}")]
    Read {
        device: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create log directory {path}: {source}")]
    LogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write log file {path}: {source}")]
    LogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    SinkClosed(#[from] SinkClosed),

    #[error("device task for {device} failed: {reason}")]
    TaskFailed { device: String, reason: String },
}
