use crate::aggregate::{SwarmSnapshot, SwarmState};
use crate::analysis::discover::{discover_logs, node_id_from_file_name};
use crate::analysis::error::AnalyzeError;
use crate::ingest::NodeId;
use crate::monitor::strip_timestamp_prefix;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub node: NodeId,
    /// Non-blank lines fed to the parser.
    pub lines: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadedLogs {
    pub files: Vec<LoadedFile>,
    /// Log files whose name carries no node id.
    pub skipped: Vec<PathBuf>,
}

/// Replay every node log in `dir` into `state`.
///
/// Files are attributed to the id in their name. Zero attributable files is
/// an error, since there would be nothing to analyze.
pub fn load_dir(dir: &Path, state: &SwarmState) -> Result<LoadedLogs, AnalyzeError> {
    let paths = discover_logs(dir)?;
    tracing::info!(dir = %dir.display(), files = paths.len(), "loading logs");

    let mut logs = LoadedLogs::default();

    for path in paths {
        let node = path
            .file_name()
            .and_then(|name| node_id_from_file_name(&name.to_string_lossy()));

        let Some(node) = node else {
            tracing::warn!(file = %path.display(), "could not extract node id from file name, skipping");
            logs.skipped.push(path);
            continue;
        };

        let lines = load_file(&path, node, state)?;
        tracing::info!(file = %path.display(), node = %node, lines, "loaded log");
        logs.files.push(LoadedFile { path, node, lines });
    }

    if logs.files.is_empty() {
        return Err(AnalyzeError::NoLogFiles {
            path: dir.to_path_buf(),
        });
    }

    Ok(logs)
}

/// Replay one log file on behalf of `node`. Returns the number of non-blank
/// lines ingested.
pub fn load_file(path: &Path, node: NodeId, state: &SwarmState) -> Result<usize, AnalyzeError> {
    let bytes = fs::read(path).map_err(|e| AnalyzeError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    let text = String::from_utf8_lossy(&bytes);

    let mut ingested = 0;
    for line in text.lines() {
        let line = strip_timestamp_prefix(line.trim());
        if line.trim().is_empty() {
            continue;
        }
        state.ingest_line(node, line);
        ingested += 1;
    }

    Ok(ingested)
}

/// Load `dir` into a fresh state and return the finished snapshot.
pub fn analyze_dir(dir: &Path) -> Result<(LoadedLogs, SwarmSnapshot), AnalyzeError> {
    let state = SwarmState::new();
    let logs = load_dir(dir, &state)?;
    Ok((logs, state.snapshot()))
}
