use std::io::{self, IsTerminal};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the logging system with environment-based filtering
///
/// - Uses `RUST_LOG` for filtering (defaults to "info" if not set)
/// - Writes to stderr through a non-blocking writer so device tasks never
///   wait on diagnostics
/// - JSON with flattened fields when stderr is not a terminal
///
/// The returned guard flushes buffered events when dropped and must be kept
/// alive for the life of the process.
pub fn init_normal_logging(mode: LogMode) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (writer, guard) = tracing_appender::non_blocking(io::stderr());

    let builder = fmt().with_env_filter(filter).with_writer(writer);
    match mode {
        LogMode::Json => builder.json().flatten_event(true).init(),
        LogMode::Pretty => builder.compact().init(),
    }

    guard
}

pub fn init_logging() -> Option<WorkerGuard> {
    // If tokio-console is enabled, DO NOT install the normal subscriber
    if std::env::var("TOKIO_CONSOLE").is_ok() {
        init_console_logging();
        None
    } else {
        Some(init_normal_logging(default_log_mode()))
    }
}

fn init_console_logging() {
    console_subscriber::init();
}

pub fn default_log_mode() -> LogMode {
    if io::stderr().is_terminal() {
        LogMode::Pretty
    } else {
        LogMode::Json
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Json,
    Pretty,
}
