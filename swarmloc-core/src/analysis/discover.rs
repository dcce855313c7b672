use crate::analysis::error::AnalyzeError;
use crate::ingest::NodeId;
use glob::{Pattern, glob};
use std::fs;
use std::path::{Path, PathBuf};

const FILE_NAME_MARKER: &str = "node_";

/// Every `*.log` file directly inside `dir`, sorted by path.
pub fn discover_logs(dir: &Path) -> Result<Vec<PathBuf>, AnalyzeError> {
    if !dir.is_dir() {
        return Err(AnalyzeError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    // glob silently yields nothing for an unreadable directory
    fs::read_dir(dir).map_err(|e| AnalyzeError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let pattern = format!("{}/*.log", Pattern::escape(&dir.to_string_lossy()));
    let mut paths: Vec<_> = glob(&pattern)
        .map_err(|e| AnalyzeError::Glob {
            pattern: pattern.clone(),
            source: e,
        })?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();

    paths.sort();
    Ok(paths)
}

/// The `<digits>` of the first `node_<digits>` in a file name.
pub fn node_id_from_file_name(name: &str) -> Option<NodeId> {
    name.match_indices(FILE_NAME_MARKER).find_map(|(i, _)| {
        let rest = &name[i + FILE_NAME_MARKER.len()..];
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        NodeId::parse_decimal(&rest[..end])
    })
}
