use crate::ingest::NodeId;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Live per-node counters (hot path)
#[derive(Debug)]
struct NodeCounters {
    ranges: AtomicU64,
    errors: AtomicU64,
    discoveries: AtomicU64,
    disconnects: AtomicU64,
    /// Unix epoch milliseconds
    last_seen_ms: AtomicI64,
}

impl NodeCounters {
    fn new() -> Self {
        Self {
            ranges: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            discoveries: AtomicU64::new(0),
            disconnects: AtomicU64::new(0),
            last_seen_ms: AtomicI64::new(i64::MIN),
        }
    }

    fn touch(&self) {
        self.last_seen_ms
            .fetch_max(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    fn snapshot(&self) -> NodeStats {
        let last_seen_ms = self.last_seen_ms.load(Ordering::Relaxed);
        NodeStats {
            range_count: self.ranges.load(Ordering::Relaxed),
            error_count: self.errors.load(Ordering::Relaxed),
            discovery_count: self.discoveries.load(Ordering::Relaxed),
            disconnect_count: self.disconnects.load(Ordering::Relaxed),
            last_seen: (last_seen_ms != i64::MIN)
                .then(|| DateTime::from_timestamp_millis(last_seen_ms))
                .flatten(),
        }
    }
}

/// Immutable copy of one node's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeStats {
    pub range_count: u64,
    pub error_count: u64,
    pub discovery_count: u64,
    pub disconnect_count: u64,
    pub last_seen: Option<DateTime<Utc>>,
}

impl NodeStats {
    /// Errors per successful range; `None` without ranges.
    pub fn error_rate(&self) -> Option<f64> {
        (self.range_count > 0).then(|| self.error_count as f64 / self.range_count as f64)
    }

    pub fn is_active(&self, now: DateTime<Utc>, window: std::time::Duration) -> bool {
        let Some(last_seen) = self.last_seen else {
            return false;
        };
        now.signed_duration_since(last_seen)
            .to_std()
            .map(|age| age <= window)
            // last_seen slightly ahead of `now` still counts as active
            .unwrap_or(true)
    }
}

/// Increment-only health counters keyed by node.
#[derive(Debug, Default)]
pub struct NodeStatsTracker {
    nodes: DashMap<NodeId, NodeCounters>,
}

impl NodeStatsTracker {
    pub fn new() -> Self {
        Self {
            nodes: DashMap::new(),
        }
    }

    pub fn record_range(&self, node: NodeId) {
        self.bump(node, |c| &c.ranges);
    }

    pub fn record_error(&self, node: NodeId) {
        self.bump(node, |c| &c.errors);
    }

    pub fn record_discovery(&self, node: NodeId) {
        self.bump(node, |c| &c.discoveries);
    }

    pub fn record_disconnect(&self, node: NodeId) {
        self.bump(node, |c| &c.disconnects);
    }

    /// Marks the node as seen without counting anything.
    pub fn touch(&self, node: NodeId) {
        self.nodes
            .entry(node)
            .or_insert_with(NodeCounters::new)
            .touch();
    }

    pub fn get(&self, node: NodeId) -> Option<NodeStats> {
        self.nodes.get(&node).map(|c| c.snapshot())
    }

    pub fn snapshot(&self) -> BTreeMap<NodeId, NodeStats> {
        self.nodes
            .iter()
            .map(|entry| (*entry.key(), entry.value().snapshot()))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn bump(&self, node: NodeId, counter: impl Fn(&NodeCounters) -> &AtomicU64) {
        let counters = self.nodes.entry(node).or_insert_with(NodeCounters::new);

        counter(&*counters).fetch_add(1, Ordering::Relaxed);
        counters.touch();
    }
}
