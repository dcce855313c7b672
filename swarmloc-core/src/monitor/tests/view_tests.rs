use crate::aggregate::{CellView, NodeStats};
use crate::ingest::NodeId;
use crate::monitor::{MatrixFrame, render_matrix_frame};
use crate::render::PlainHighlighter;
use chrono::{Duration as ChronoDuration, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

fn cell(source: u16, target: u16, distance_m: f64) -> CellView {
    CellView {
        source: NodeId(source),
        target: NodeId(target),
        distance_m,
        rx_power_dbm: -70.0,
        age: Duration::ZERO,
    }
}

fn stats(ranges: u64, errors: u64, seen_secs_ago: i64) -> NodeStats {
    NodeStats {
        range_count: ranges,
        error_count: errors,
        last_seen: Some(Utc::now() - ChronoDuration::seconds(seen_secs_ago)),
        ..NodeStats::default()
    }
}

#[test]
fn empty_matrix_says_so() {
    let frame = MatrixFrame {
        nodes: Vec::new(),
        fresh: Vec::new(),
        stats: BTreeMap::new(),
        window: Duration::from_secs(5),
        now: Utc::now(),
    };

    let text = render_matrix_frame(&frame, &PlainHighlighter);
    assert!(text.contains("RANGING MATRIX (distances in meters)"));
    assert!(text.contains("No ranging data yet..."));
    assert!(!text.contains("NODE STATISTICS"));
}

#[test]
fn fresh_cells_show_distance_and_missing_cells_show_marker() {
    let frame = MatrixFrame {
        nodes: vec![NodeId(1), NodeId(2), NodeId(3)],
        // (1,3) exists in the matrix but is stale, so it is absent here
        fresh: vec![cell(1, 2, 1.52), cell(2, 1, 1.49)],
        stats: BTreeMap::new(),
        window: Duration::from_secs(5),
        now: Utc::now(),
    };

    let text = render_matrix_frame(&frame, &PlainHighlighter);

    assert!(text.contains("Node 1    ---       1.52      ---       \n"));
    assert!(text.contains("Node 2    1.49      ---       ---       \n"));
    assert!(text.contains("Node 3    ---       ---       ---       \n"));
}

#[test]
fn node_lines_report_activity() {
    let frame = MatrixFrame {
        nodes: vec![NodeId(1), NodeId(2)],
        fresh: vec![cell(1, 2, 1.52)],
        stats: BTreeMap::from([(NodeId(1), stats(12, 1, 1)), (NodeId(2), stats(3, 0, 30))]),
        window: Duration::from_secs(5),
        now: Utc::now(),
    };

    let text = render_matrix_frame(&frame, &PlainHighlighter);

    assert!(text.contains("NODE STATISTICS"));
    assert!(text.contains("Node 1: ACTIVE | Ranges: 12 | Errors: 1\n"));
    assert!(text.contains("Node 2: INACTIVE | Ranges: 3 | Errors: 0\n"));
}
