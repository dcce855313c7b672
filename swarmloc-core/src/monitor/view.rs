use crate::aggregate::{CellView, NodeStats, SwarmState};
use crate::ingest::NodeId;
use crate::monitor::shutdown::ShutdownListener;
use crate::monitor::sink::write_flush;
use crate::render::{DIAGONAL_MARK, Highlighter, render_grid};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWrite;

const COLUMN_WIDTH: usize = 10;
const RULE_WIDTH: usize = 60;

/// Everything one matrix redraw needs, captured at a single point in time.
#[derive(Debug, Clone)]
pub struct MatrixFrame {
    /// Every node that ever appeared in the matrix, fresh or not.
    pub nodes: Vec<NodeId>,
    /// Cells within the staleness window.
    pub fresh: Vec<CellView>,
    pub stats: BTreeMap<NodeId, NodeStats>,
    pub window: Duration,
    pub now: DateTime<Utc>,
}

impl MatrixFrame {
    pub fn capture(state: &SwarmState, window: Duration) -> Self {
        Self {
            nodes: state.matrix().node_ids().into_iter().collect(),
            fresh: state.matrix().snapshot(window),
            stats: state.stats().snapshot(),
            window,
            now: Utc::now(),
        }
    }
}

pub fn render_matrix_frame(frame: &MatrixFrame, highlighter: &dyn Highlighter) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!(
        "\n{rule}\n{}\n{rule}\n",
        highlighter.heading("RANGING MATRIX (distances in meters)")
    ));

    if frame.nodes.is_empty() {
        out.push_str("No ranging data yet...\n");
        return out;
    }

    let fresh: HashMap<(NodeId, NodeId), f64> = frame
        .fresh
        .iter()
        .map(|c| ((c.source, c.target), c.distance_m))
        .collect();

    out.push_str(&render_grid(&frame.nodes, COLUMN_WIDTH, |source, target| {
        fresh
            .get(&(source, target))
            .map(|d| format!("{d:.2}"))
            .unwrap_or_else(|| DIAGONAL_MARK.to_string())
    }));

    out.push_str(&format!(
        "\n{rule}\n{}\n{rule}\n",
        highlighter.heading("NODE STATISTICS")
    ));

    for (node, stats) in &frame.stats {
        let active = stats.is_active(frame.now, frame.window);
        let line = format!(
            "Node {node}: {} | Ranges: {} | Errors: {}",
            if active { "ACTIVE" } else { "INACTIVE" },
            stats.range_count,
            stats.error_count
        );
        let line = if active {
            highlighter.good(&line)
        } else {
            highlighter.bad(&line)
        };
        out.push_str(&line);
        out.push('\n');
    }

    out
}

/// Redraw the matrix every `interval` until stop is requested.
pub async fn run_matrix_view<W>(
    state: Arc<SwarmState>,
    mut stop: ShutdownListener,
    interval: Duration,
    window: Duration,
    highlighter: Arc<dyn Highlighter>,
    mut out: W,
) where
    W: AsyncWrite + Unpin + Send,
{
    loop {
        tokio::select! {
            biased;
            _ = stop.triggered() => break,
            _ = tokio::time::sleep(interval) => {}
        }

        let frame = MatrixFrame::capture(&state, window);
        let text = render_matrix_frame(&frame, highlighter.as_ref());
        if let Err(e) = write_flush(&mut out, &text).await {
            tracing::warn!(error = %e, "matrix view write failed, stopping view");
            break;
        }
    }
}
