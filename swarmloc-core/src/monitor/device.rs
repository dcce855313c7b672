use crate::aggregate::SwarmState;
use crate::conf::MonitorConfig;
use crate::ingest::{
    IdentityPolicy, IdentityResolver, IdentitySource, IdentityState, LineReader, NodeId,
    ReadOutcome,
};
use crate::monitor::device_log::DeviceLog;
use crate::monitor::error::DeviceError;
use crate::monitor::shutdown::ShutdownListener;
use crate::monitor::sink::{OutputSink, RenderedLine};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, BufReader};

/// A device named on the command line: `PATH` or `PATH=ID`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSpec {
    pub path: PathBuf,
    /// Operator-supplied id; skips the identity handshake.
    pub node: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidDeviceSpec {
    #[error("device path is empty")]
    EmptyPath,

    #[error("invalid node id '{id}' for device {path}")]
    BadId { path: String, id: String },
}

impl FromStr for DeviceSpec {
    type Err = InvalidDeviceSpec;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, node) = match s.rsplit_once('=') {
            Some((path, id)) => {
                let node = NodeId::parse_decimal(id).ok_or_else(|| InvalidDeviceSpec::BadId {
                    path: path.to_string(),
                    id: id.to_string(),
                })?;
                (path, Some(node))
            }
            None => (s, None),
        };

        if path.trim().is_empty() {
            return Err(InvalidDeviceSpec::EmptyPath);
        }

        Ok(Self {
            path: PathBuf::from(path),
            node,
        })
    }
}

impl fmt::Display for DeviceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())?;
        if let Some(node) = self.node {
            write!(f, "={node}")?;
        }
        Ok(())
    }
}

/// Per-device knobs shared by every reader in a session.
#[derive(Debug, Clone)]
pub struct DeviceSettings {
    pub log_dir: PathBuf,
    pub read_timeout: Duration,
    pub identity: IdentityPolicy,
    pub session_start: DateTime<Local>,
}

impl DeviceSettings {
    pub fn from_config(config: &MonitorConfig, session_start: DateTime<Local>) -> Self {
        Self {
            log_dir: config.log_dir.clone(),
            read_timeout: config.read_timeout(),
            identity: config.identity.policy(),
            session_start,
        }
    }
}

/// What a device task did before it exited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceSummary {
    pub device: String,
    pub node: NodeId,
    pub identity: IdentitySource,
    /// Non-blank lines ingested, including those replayed after the handshake.
    pub lines: u64,
    pub log_path: PathBuf,
}

/// Drives one device stream from handshake to shutdown.
pub struct DeviceReader<R> {
    name: String,
    reader: LineReader<R>,
    resolver: IdentityResolver,
    state: Arc<SwarmState>,
    sink: OutputSink,
    stop: ShutdownListener,
    settings: DeviceSettings,
}

impl<R> DeviceReader<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(
        name: impl Into<String>,
        stream: R,
        preset: Option<NodeId>,
        state: Arc<SwarmState>,
        sink: OutputSink,
        stop: ShutdownListener,
        settings: DeviceSettings,
    ) -> Self {
        let resolver = match preset {
            Some(node) => IdentityResolver::preresolved(node),
            None => IdentityResolver::new(settings.identity),
        };

        Self {
            name: name.into(),
            reader: LineReader::new(stream),
            resolver,
            state,
            sink,
            stop,
            settings,
        }
    }

    pub async fn run(mut self) -> Result<DeviceSummary, DeviceError> {
        let node = self.resolve_identity().await?;

        let mut log =
            DeviceLog::create(&self.settings.log_dir, node, self.settings.session_start).await?;
        tracing::info!(
            device = %self.name,
            node = %node,
            log = %log.path().display(),
            "logging device"
        );

        let mut lines = 0u64;
        let result = self.ingest(node, &mut log, &mut lines).await;

        let log_path = log.path().to_path_buf();
        let closed = log.close().await;
        result?;
        closed?;

        tracing::info!(device = %self.name, node = %node, lines, "device reader finished");

        Ok(DeviceSummary {
            device: self.name,
            node,
            identity: self.resolver.source().unwrap_or(IdentitySource::Sentinel),
            lines,
            log_path,
        })
    }

    async fn resolve_identity(&mut self) -> Result<NodeId, DeviceError> {
        if let Some(node) = self.resolver.resolved() {
            return Ok(node);
        }

        tracing::info!(
            device = %self.name,
            deadline_ms = self.settings.identity.deadline().as_millis() as u64,
            "waiting for node id"
        );

        loop {
            let wait = self.resolver.poll_interval();
            let outcome = tokio::select! {
                biased;
                _ = self.stop.triggered() => break,
                outcome = self.reader.next_line(wait) => outcome.map_err(|e| self.read_error(e))?,
            };

            let line = match outcome {
                ReadOutcome::Line(line) => Some(line),
                ReadOutcome::Idle => None,
                ReadOutcome::Closed => break,
            };

            if let IdentityState::Resolved(node) = self.resolver.attempt(line) {
                self.report_identity(node);
                return Ok(node);
            }
        }

        let node = self.resolver.give_up();
        self.report_identity(node);
        Ok(node)
    }

    fn report_identity(&self, node: NodeId) {
        match self.resolver.source() {
            Some(IdentitySource::Sentinel) | None => tracing::warn!(
                device = %self.name,
                node = %node,
                "could not detect node id, using sentinel"
            ),
            Some(source) => tracing::info!(
                device = %self.name,
                node = %node,
                ?source,
                "detected node id"
            ),
        }
    }

    async fn ingest(
        &mut self,
        node: NodeId,
        log: &mut DeviceLog,
        lines: &mut u64,
    ) -> Result<(), DeviceError> {
        for line in self.resolver.take_backlog() {
            if self.handle_line(node, log, &line).await? {
                *lines += 1;
            }
        }

        loop {
            let outcome = tokio::select! {
                biased;
                _ = self.stop.triggered() => {
                    tracing::debug!(device = %self.name, "stop observed");
                    return Ok(());
                }
                outcome = self.reader.next_line(self.settings.read_timeout) => {
                    outcome.map_err(|e| self.read_error(e))?
                }
            };

            match outcome {
                ReadOutcome::Line(line) => {
                    if self.handle_line(node, log, &line).await? {
                        *lines += 1;
                    }
                }
                ReadOutcome::Idle => {}
                ReadOutcome::Closed => {
                    tracing::info!(device = %self.name, node = %node, "device stream closed");
                    return Ok(());
                }
            }
        }
    }

    /// Fold one line into the model, the device log and the display queue.
    /// Blank lines are skipped and reported as `false`.
    async fn handle_line(
        &mut self,
        node: NodeId,
        log: &mut DeviceLog,
        line: &str,
    ) -> Result<bool, DeviceError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(false);
        }

        let received_at = Local::now();
        self.state.ingest_line(node, line);
        log.append(received_at, line).await?;
        self.sink
            .send(RenderedLine {
                node,
                received_at,
                line: line.to_string(),
            })
            .await?;

        Ok(true)
    }

    fn read_error(&self, source: std::io::Error) -> DeviceError {
        DeviceError::Read {
            device: self.name.clone(),
            source,
        }
    }
}

/// Open a device node or capture file for reading.
///
/// Line settings such as baud rate are expected to be configured on the device
/// beforehand.
pub async fn open_device(path: &Path) -> Result<BufReader<File>, DeviceError> {
    let file = File::open(path).await.map_err(|e| DeviceError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(BufReader::new(file))
}
