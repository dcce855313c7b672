use crate::analysis::{AnalysisReport, analyze_dir, export_csv};
use crate::render::select_highlighter;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Directory containing node_<id>_*.log files
    pub log_dir: PathBuf,

    /// Export range measurements to a CSV file
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let (logs, snapshot) = analyze_dir(&args.log_dir)?;
    tracing::info!(
        files = logs.files.len(),
        skipped = logs.skipped.len(),
        "logs loaded"
    );

    let report = AnalysisReport::build(&snapshot);

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        let highlighter = select_highlighter(args.no_color);
        println!("{}", report.render(highlighter.as_ref()));
    }

    if let Some(path) = args.export {
        let rows = export_csv(&snapshot.ranges, &path)?;
        if !args.json {
            println!("✓ Exported {rows} range measurements to {}", path.display());
        }
    }

    Ok(())
}
