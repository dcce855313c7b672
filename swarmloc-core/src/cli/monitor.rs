use crate::analysis::AnalysisReport;
use crate::conf::{MonitorConfig, load_or_default};
use crate::monitor::{DeviceSpec, MonitorSession, SessionOptions, SessionOutcome};
use crate::render::{Highlighter, select_highlighter};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Device to monitor, optionally with a known node id (repeatable)
    #[arg(short, long = "device", value_name = "PATH[=ID]", required = true)]
    pub devices: Vec<DeviceSpec>,

    /// Show the live ranging matrix instead of raw device lines
    #[arg(long)]
    pub matrix: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Directory for per-node log files (overrides the config file)
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to an HCL config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Serial baud rate, recorded in logs only. Configure the line beforehand
    /// (for example with `stty`).
    #[arg(long, default_value_t = 115_200)]
    pub baud: u32,
}

pub fn run(args: MonitorArgs) -> anyhow::Result<()> {
    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(dir) = args.log_dir {
        config.monitor.log_dir = dir;
    }

    let highlighter = select_highlighter(args.no_color);

    println!("Monitoring {} device(s):", args.devices.len());
    for device in &args.devices {
        println!("  - {device}");
    }
    println!();

    let grace = config.monitor.shutdown_grace();
    let outcome = block_on_bounded(
        grace,
        run_session(
            args.devices,
            args.matrix,
            args.baud,
            config.monitor,
            highlighter.clone(),
        ),
    )??;

    print_summary(&outcome, highlighter.as_ref());

    if outcome.devices.is_empty() && !outcome.failures.is_empty() {
        anyhow::bail!("no device could be monitored");
    }
    Ok(())
}

/// Run `future` on a fresh multi-thread runtime, then give leftover blocking
/// work at most `grace` before the runtime is torn down.
///
/// Device reads go through the blocking pool; a read parked on an idle tty or
/// FIFO never returns on its own and must not keep the process alive.
pub fn block_on_bounded<F: Future>(grace: Duration, future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let output = runtime.block_on(future);
    runtime.shutdown_timeout(grace);
    Ok(output)
}

async fn run_session(
    devices: Vec<DeviceSpec>,
    show_matrix: bool,
    baud: u32,
    config: MonitorConfig,
    highlighter: Arc<dyn Highlighter>,
) -> anyhow::Result<SessionOutcome> {
    let mut session = MonitorSession::start(SessionOptions {
        config,
        show_matrix,
        highlighter,
    });
    session.shutdown_handle().install_ctrlc()?;

    tracing::info!(devices = devices.len(), baud, "starting monitor");

    for spec in &devices {
        session.spawn_path(spec).await;
    }

    session.run_until_stopped().await;
    println!("\nShutting down...");

    Ok(session.finish().await)
}

fn print_summary(outcome: &SessionOutcome, h: &dyn Highlighter) {
    for device in &outcome.devices {
        println!(
            "Node {} on {}: {} lines, log {}",
            device.node,
            device.device,
            device.lines,
            device.log_path.display()
        );
    }

    for failure in &outcome.failures {
        println!("{}", h.bad(&format!("{}: {}", failure.device, failure.error)));
    }

    for device in &outcome.aborted {
        println!("{}", h.warn(&format!("{device}: did not stop in time, aborted")));
    }

    let report = AnalysisReport::build(&outcome.snapshot);
    println!("{}", report.render(h));
}
