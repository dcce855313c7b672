use crate::aggregate::{SwarmSnapshot, SwarmState};
use crate::conf::MonitorConfig;
use crate::ingest::NodeId;
use crate::monitor::device::{DeviceReader, DeviceSettings, DeviceSpec, DeviceSummary, open_device};
use crate::monitor::error::DeviceError;
use crate::monitor::shutdown::ShutdownHandle;
use crate::monitor::sink::{DisplayMode, OutputSink, output_channel, run_display};
use crate::monitor::view::run_matrix_view;
use crate::render::Highlighter;
use chrono::Local;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{self, AsyncBufRead, AsyncWrite};
use tokio::task::{self, JoinHandle, JoinSet};

type DeviceResult = Result<DeviceSummary, DeviceError>;

pub struct SessionOptions {
    pub config: MonitorConfig,
    /// Show the periodic matrix instead of the line stream.
    pub show_matrix: bool,
    pub highlighter: Arc<dyn Highlighter>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceFailure {
    pub device: String,
    pub error: String,
}

/// How a monitoring session ended.
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutcome {
    pub devices: Vec<DeviceSummary>,
    pub failures: Vec<DeviceFailure>,
    /// Devices still running when the grace period ran out.
    pub aborted: Vec<String>,
    pub lines_displayed: u64,
    pub snapshot: SwarmSnapshot,
}

/// One live monitoring run: device readers, the display consumer and,
/// optionally, the matrix view.
///
/// Must be started from within a tokio runtime.
pub struct MonitorSession {
    state: Arc<SwarmState>,
    shutdown: ShutdownHandle,
    sink: OutputSink,
    display: JoinHandle<u64>,
    view: Option<JoinHandle<()>>,
    devices: JoinSet<DeviceResult>,
    names: HashMap<task::Id, String>,
    settings: DeviceSettings,
    stagger: Duration,
    grace: Duration,
    spawned: usize,
    finished: Vec<DeviceSummary>,
    failures: Vec<DeviceFailure>,
}

impl MonitorSession {
    pub fn start(options: SessionOptions) -> Self {
        Self::start_with_writers(options, io::stdout(), io::stdout())
    }

    pub fn start_with_writers<D, V>(options: SessionOptions, display_out: D, view_out: V) -> Self
    where
        D: AsyncWrite + Unpin + Send + 'static,
        V: AsyncWrite + Unpin + Send + 'static,
    {
        let SessionOptions {
            config,
            show_matrix,
            highlighter,
        } = options;

        let state = Arc::new(SwarmState::new());
        let shutdown = ShutdownHandle::new();
        let (sink, rx) = output_channel(config.queue_capacity);

        let mode = if show_matrix {
            DisplayMode::Silent
        } else {
            DisplayMode::Lines
        };
        let display = tokio::spawn(run_display(rx, mode, highlighter.clone(), display_out));

        let view = show_matrix.then(|| {
            tokio::spawn(run_matrix_view(
                state.clone(),
                shutdown.listener(),
                config.render_interval(),
                config.staleness_window(),
                highlighter,
                view_out,
            ))
        });

        tracing::info!(
            log_dir = %config.log_dir.display(),
            matrix = show_matrix,
            "monitor session started"
        );

        Self {
            state,
            shutdown,
            sink,
            display,
            view,
            devices: JoinSet::new(),
            names: HashMap::new(),
            settings: DeviceSettings::from_config(&config, Local::now()),
            stagger: config.start_stagger(),
            grace: config.shutdown_grace(),
            spawned: 0,
            finished: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn state(&self) -> Arc<SwarmState> {
        self.state.clone()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Attach an already open stream as a device.
    pub fn spawn_device<R>(&mut self, name: impl Into<String>, stream: R, preset: Option<NodeId>)
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let name = name.into();
        let reader = DeviceReader::new(
            name.clone(),
            stream,
            preset,
            self.state.clone(),
            self.sink.clone(),
            self.shutdown.listener(),
            self.settings.clone(),
        );

        let handle = self.devices.spawn(reader.run());
        self.names.insert(handle.id(), name);
        self.spawned += 1;
    }

    /// Open `spec.path` and attach it, after the start stagger when other
    /// devices are already running.
    pub async fn spawn_path(&mut self, spec: &DeviceSpec) {
        if self.spawned > 0 && !self.stagger.is_zero() {
            let mut stop = self.shutdown.listener();
            tokio::select! {
                _ = stop.triggered() => return,
                _ = tokio::time::sleep(self.stagger) => {}
            }
        }

        let name = spec.path.display().to_string();
        let path = spec.path.clone();
        let reader_args = (
            self.state.clone(),
            self.sink.clone(),
            self.shutdown.listener(),
            self.settings.clone(),
        );
        let preset = spec.node;
        let task_name = name.clone();

        let handle = self.devices.spawn(async move {
            let stream = open_device(&path).await?;
            let (state, sink, stop, settings) = reader_args;
            DeviceReader::new(task_name, stream, preset, state, sink, stop, settings)
                .run()
                .await
        });

        tracing::info!(device = %name, node = ?spec.node, "device started");
        self.names.insert(handle.id(), name);
        self.spawned += 1;
    }

    /// Wait until stop is requested or every device has ended on its own.
    pub async fn run_until_stopped(&mut self) {
        let mut stop = self.shutdown.listener();

        loop {
            tokio::select! {
                biased;
                _ = stop.triggered() => return,
                joined = self.devices.join_next_with_id() => match joined {
                    Some(joined) => self.record(joined),
                    None => {
                        tracing::info!("all devices finished");
                        return;
                    }
                },
            }
        }
    }

    /// Stop every task, give device readers the grace period to close their
    /// logs, then abort whatever is left.
    pub async fn finish(mut self) -> SessionOutcome {
        self.shutdown.trigger();

        let deadline = tokio::time::Instant::now() + self.grace;
        loop {
            match tokio::time::timeout_at(deadline, self.devices.join_next_with_id()).await {
                Ok(Some(joined)) => self.record(joined),
                Ok(None) => break,
                Err(_) => {
                    tracing::warn!(
                        remaining = self.devices.len(),
                        "grace period elapsed, aborting device tasks"
                    );
                    break;
                }
            }
        }

        let mut aborted = Vec::new();
        if !self.devices.is_empty() {
            self.devices.abort_all();
            while let Some(joined) = self.devices.join_next_with_id().await {
                match joined {
                    Err(e) if e.is_cancelled() => aborted.push(self.take_name(e.id())),
                    other => self.record(other),
                }
            }
        }

        // Dropping the last sender lets the display task finish draining.
        drop(self.sink);
        let lines_displayed = self.display.await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "display task failed");
            0
        });

        if let Some(view) = self.view {
            if let Err(e) = view.await {
                tracing::error!(error = %e, "matrix view task failed");
            }
        }

        SessionOutcome {
            devices: self.finished,
            failures: self.failures,
            aborted,
            lines_displayed,
            snapshot: self.state.snapshot(),
        }
    }

    fn record(&mut self, joined: Result<(task::Id, DeviceResult), task::JoinError>) {
        match joined {
            Ok((id, Ok(summary))) => {
                self.names.remove(&id);
                self.finished.push(summary);
            }
            Ok((id, Err(e))) => {
                let device = self.take_name(id);
                tracing::error!(device = %device, error = %e, "device task stopped");
                self.failures.push(DeviceFailure {
                    device,
                    error: e.to_string(),
                });
            }
            Err(e) => {
                let device = self.take_name(e.id());
                let error = DeviceError::TaskFailed {
                    device: device.clone(),
                    reason: e.to_string(),
                };
                tracing::error!(device = %device, error = %error, "device task panicked");
                self.failures.push(DeviceFailure {
                    device,
                    error: error.to_string(),
                });
            }
        }
    }

    fn take_name(&mut self, id: task::Id) -> String {
        self.names
            .remove(&id)
            .unwrap_or_else(|| format!("task {id}"))
    }
}
