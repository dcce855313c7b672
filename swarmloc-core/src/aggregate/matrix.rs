use crate::ingest::{Measurement, NodeId};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

pub const DEFAULT_STALENESS_WINDOW: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixCell {
    pub distance_m: f64,
    pub rx_power_dbm: f64,
    /// Local capture time, not the device clock.
    pub captured_at: Instant,
}

/// Read-only view of one cell, as handed to renderers and the issue detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellView {
    pub source: NodeId,
    pub target: NodeId,
    pub distance_m: f64,
    pub rx_power_dbm: f64,
    #[serde(skip)]
    pub age: Duration,
}

/// Most recent distance per ordered (source, target) pair.
///
/// Writers for the same pair are serialized by the map's shard lock and the
/// capture time is taken while that lock is held, so the newest capture always
/// wins.
#[derive(Debug, Default)]
pub struct RangingMatrix {
    cells: DashMap<(NodeId, NodeId), MatrixCell>,
}

impl RangingMatrix {
    pub fn new() -> Self {
        Self {
            cells: DashMap::new(),
        }
    }

    pub fn update(&self, measurement: &Measurement) {
        let key = (measurement.source, measurement.target);
        let cell = |captured_at| MatrixCell {
            distance_m: measurement.distance_m,
            rx_power_dbm: measurement.rx_power_dbm,
            captured_at,
        };

        self.cells
            .entry(key)
            .and_modify(|existing| *existing = cell(Instant::now()))
            .or_insert_with(|| cell(Instant::now()));
    }

    /// Cells captured within `window` of now.
    pub fn snapshot(&self, window: Duration) -> Vec<CellView> {
        self.snapshot_at(window, Instant::now())
    }

    pub(crate) fn snapshot_at(&self, window: Duration, now: Instant) -> Vec<CellView> {
        self.views(now)
            .into_iter()
            .filter(|view| view.age <= window)
            .collect()
    }

    /// Every cell regardless of age.
    pub fn all_cells(&self) -> Vec<CellView> {
        self.views(Instant::now())
    }

    pub fn get(&self, source: NodeId, target: NodeId) -> Option<MatrixCell> {
        self.cells.get(&(source, target)).map(|cell| *cell)
    }

    pub fn contains(&self, source: NodeId, target: NodeId) -> bool {
        self.cells.contains_key(&(source, target))
    }

    /// Every id seen as either end of a pair.
    pub fn node_ids(&self) -> BTreeSet<NodeId> {
        self.cells
            .iter()
            .flat_map(|entry| {
                let (source, target) = *entry.key();
                [source, target]
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn views(&self, now: Instant) -> Vec<CellView> {
        let mut views: Vec<CellView> = self
            .cells
            .iter()
            .map(|entry| {
                let (source, target) = *entry.key();
                let cell = entry.value();
                CellView {
                    source,
                    target,
                    distance_m: cell.distance_m,
                    rx_power_dbm: cell.rx_power_dbm,
                    age: now.saturating_duration_since(cell.captured_at),
                }
            })
            .collect();

        // stable ordering: by (source, target)
        views.sort_by_key(|view| (view.source, view.target));
        views
    }
}
