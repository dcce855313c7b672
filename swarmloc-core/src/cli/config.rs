use crate::conf::{SwarmConfig, load_config, load_or_default};
use clap::Subcommand;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate a configuration file and exit
    Check {
        /// Path to config file
        #[arg(default_value = "swarmloc.hcl")]
        path: PathBuf,
    },

    /// Print the resolved configuration (defaults when no file is given)
    Dump {
        path: Option<PathBuf>,

        /// Output as JSON
        #[arg(long, conflicts_with = "yaml")]
        json: bool,

        /// Output as YAML
        #[arg(long)]
        yaml: bool,
    },
}

pub fn run(cmd: ConfigCmd) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Check { path } => check(&path),
        ConfigCmd::Dump { path, yaml, .. } => dump(path.as_deref(), yaml),
    }
}

pub fn check(path: &Path) -> anyhow::Result<()> {
    let cfg = load_config(path)?;
    print!("{}", check_summary(&cfg));
    Ok(())
}

pub fn check_summary(cfg: &SwarmConfig) -> String {
    let m = &cfg.monitor;
    format!(
        "✔ Config loaded successfully\n\
         ✔ log dir {}\n\
         ✔ read timeout {}ms, staleness window {}ms, render interval {}ms\n\
         ✔ queue capacity {}, shutdown grace {}ms, start stagger {}ms\n\
         ✔ identity handshake {} attempts x {}ms\n",
        m.log_dir.display(),
        m.read_timeout_ms,
        m.staleness_window_ms,
        m.render_interval_ms,
        m.queue_capacity,
        m.shutdown_grace_ms,
        m.start_stagger_ms,
        m.identity.attempts,
        m.identity.poll_interval_ms,
    )
}

/// JSON unless YAML is asked for.
pub fn dump(path: Option<&Path>, yaml: bool) -> anyhow::Result<()> {
    let cfg = load_or_default(path)?;
    if yaml {
        dump_yaml(&cfg)
    } else {
        dump_json(&cfg)
    }
}

fn dump_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

fn dump_yaml<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_yaml::to_string(value)?;
    println!("{s}");
    Ok(())
}
