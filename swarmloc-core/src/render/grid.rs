use crate::ingest::NodeId;

pub const DIAGONAL_MARK: &str = "---";

/// Lays out a square node-by-node grid.
///
/// Rows are sources and columns are targets. `cell` is asked for every
/// off-diagonal pair and returns the already formatted text; the diagonal is
/// always [`DIAGONAL_MARK`].
pub fn render_grid<F>(nodes: &[NodeId], width: usize, mut cell: F) -> String
where
    F: FnMut(NodeId, NodeId) -> String,
{
    let mut out = String::new();

    out.push_str(&format!("{:<width$}", "From\\To"));
    for target in nodes {
        out.push_str(&format!("{:<width$}", format!("Node {target}")));
    }
    out.push('\n');

    for &source in nodes {
        out.push_str(&format!("{:<width$}", format!("Node {source}")));
        for &target in nodes {
            let text = if source == target {
                DIAGONAL_MARK.to_string()
            } else {
                cell(source, target)
            };
            out.push_str(&format!("{text:<width$}"));
        }
        out.push('\n');
    }

    out
}
