use clap::{Parser, Subcommand};
use swarmloc_core::cli::analyze::AnalyzeArgs;
use swarmloc_core::cli::config::ConfigCmd;
use swarmloc_core::cli::monitor::MonitorArgs;
use swarmloc_core::cli::{analyze, config, monitor};
use swarmloc_core::logging::init_logging;

#[derive(Parser, Debug)]
#[command(
    name = "swarmloc",
    version,
    about = "SwarmLoc: multi-node UWB ranging monitor and log analyzer"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Monitor live device streams
    Monitor(MonitorArgs),

    /// Analyze archived node logs
    Analyze(AnalyzeArgs),

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

fn main() {
    let cli = Cli::parse();
    let guard = init_logging();

    let result: anyhow::Result<()> = match cli.command {
        Command::Monitor(args) => monitor::run(args),
        Command::Analyze(args) => analyze::run(args),
        Command::Config { cmd } => config::run(cmd),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {e:#}");
        // flush buffered log events before exiting
        drop(guard);
        std::process::exit(1);
    }
}
