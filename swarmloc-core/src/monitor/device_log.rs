use crate::ingest::NodeId;
use crate::monitor::error::DeviceError;
use chrono::{DateTime, Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Session start stamp embedded in log file names.
pub const SESSION_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Local receive time prefixed to every logged line.
pub const LOG_LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// `node_<id>_<YYYYmmdd_HHMMSS>.log`
pub fn log_file_name(node: NodeId, session_start: DateTime<Local>) -> String {
    format!(
        "node_{node}_{}.log",
        session_start.format(SESSION_TIMESTAMP_FORMAT)
    )
}

pub fn format_log_line(at: DateTime<Local>, line: &str) -> String {
    format!("[{}] {line}\n", at.format(LOG_LINE_TIMESTAMP_FORMAT))
}

/// Undo [`format_log_line`]. Lines without a well-formed stamp are returned
/// unchanged, so raw device captures load as well.
pub fn strip_timestamp_prefix(line: &str) -> &str {
    let Some(rest) = line.strip_prefix('[') else {
        return line;
    };
    let Some((stamp, body)) = rest.split_once(']') else {
        return line;
    };

    if NaiveDateTime::parse_from_str(stamp, LOG_LINE_TIMESTAMP_FORMAT).is_err() {
        return line;
    }

    body.strip_prefix(' ').unwrap_or(body)
}

/// Append-only per-device log. Every line is flushed as soon as it is written.
#[derive(Debug)]
pub struct DeviceLog {
    path: PathBuf,
    file: File,
}

impl DeviceLog {
    pub async fn create(
        dir: &Path,
        node: NodeId,
        session_start: DateTime<Local>,
    ) -> Result<Self, DeviceError> {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| DeviceError::LogDir {
                path: dir.to_path_buf(),
                source: e,
            })?;

        let path = dir.join(log_file_name(node, session_start));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| DeviceError::LogFile {
                path: path.clone(),
                source: e,
            })?;

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&mut self, at: DateTime<Local>, line: &str) -> Result<(), DeviceError> {
        let entry = format_log_line(at, line);
        self.file
            .write_all(entry.as_bytes())
            .await
            .map_err(|e| self.write_error(e))?;
        self.file.flush().await.map_err(|e| self.write_error(e))
    }

    pub async fn close(mut self) -> Result<(), DeviceError> {
        self.file.flush().await.map_err(|e| self.write_error(e))?;
        self.file.sync_all().await.map_err(|e| self.write_error(e))
    }

    fn write_error(&self, source: std::io::Error) -> DeviceError {
        DeviceError::LogWrite {
            path: self.path.clone(),
            source,
        }
    }
}
