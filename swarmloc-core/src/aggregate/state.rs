use crate::aggregate::matrix::{CellView, RangingMatrix};
use crate::aggregate::stats::{NodeStats, NodeStatsTracker};
use crate::ingest::{Event, EventKind, Measurement, NodeId, ParsedLine, parse_line};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A measurement together with the device that reported it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeRecord {
    pub source_node: NodeId,
    #[serde(flatten)]
    pub measurement: Measurement,
}

/// The aggregation object shared by every device reader.
///
/// Live and batch ingestion both go through [`SwarmState::ingest_line`], so
/// the issue detector sees identical data no matter where lines came from.
/// Each public operation is atomic on its own; there are no multi-key
/// transactions.
#[derive(Debug, Default)]
pub struct SwarmState {
    matrix: RangingMatrix,
    stats: NodeStatsTracker,
    events: Mutex<Vec<Event>>,
    ranges: Mutex<Vec<RangeRecord>>,
}

impl SwarmState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `line` and fold it into the model on behalf of `node`.
    pub fn ingest_line(&self, node: NodeId, line: &str) -> Option<ParsedLine> {
        self.stats.touch(node);

        let parsed = parse_line(line)?;
        self.apply(node, &parsed, line);
        Some(parsed)
    }

    pub fn apply(&self, node: NodeId, parsed: &ParsedLine, raw_line: &str) {
        match parsed {
            ParsedLine::Measurement(measurement) => self.record_measurement(node, measurement),
            ParsedLine::Event(kind) => self.record_event(node, *kind, raw_line),
            // identity only matters during the handshake
            ParsedLine::IdentityHint(_) => {}
        }
    }

    pub fn record_measurement(&self, node: NodeId, measurement: &Measurement) {
        self.matrix.update(measurement);
        self.stats.record_range(node);
        lock(&self.ranges).push(RangeRecord {
            source_node: node,
            measurement: measurement.clone(),
        });
    }

    pub fn record_event(&self, node: NodeId, kind: EventKind, raw_line: &str) {
        match kind {
            EventKind::Discovery => self.stats.record_discovery(node),
            EventKind::Disconnect => self.stats.record_disconnect(node),
            EventKind::Error => self.stats.record_error(node),
        }

        lock(&self.events).push(Event {
            node,
            kind,
            raw_line: raw_line.trim().to_string(),
        });
    }

    pub fn matrix(&self) -> &RangingMatrix {
        &self.matrix
    }

    pub fn stats(&self) -> &NodeStatsTracker {
        &self.stats
    }

    pub fn events(&self) -> Vec<Event> {
        lock(&self.events).clone()
    }

    pub fn ranges(&self) -> Vec<RangeRecord> {
        lock(&self.ranges).clone()
    }

    pub fn snapshot(&self) -> SwarmSnapshot {
        SwarmSnapshot {
            nodes: self.stats.snapshot(),
            cells: self.matrix.all_cells(),
            events: self.events(),
            ranges: self.ranges(),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicked writer leaves a fully pushed or untouched Vec behind.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Completed, immutable view of the model for analysis and reporting.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SwarmSnapshot {
    pub nodes: BTreeMap<NodeId, NodeStats>,
    pub cells: Vec<CellView>,
    pub events: Vec<Event>,
    pub ranges: Vec<RangeRecord>,
}

impl SwarmSnapshot {
    pub fn total_ranges(&self) -> u64 {
        self.nodes.values().map(|s| s.range_count).sum()
    }

    pub fn total_errors(&self) -> u64 {
        self.nodes.values().map(|s| s.error_count).sum()
    }

    pub fn total_disconnects(&self) -> u64 {
        self.nodes.values().map(|s| s.disconnect_count).sum()
    }

    pub fn distances(&self) -> Vec<f64> {
        self.ranges
            .iter()
            .map(|r| r.measurement.distance_m)
            .collect()
    }
}
