use crate::aggregate::{CellView, SwarmSnapshot};
use crate::analysis::distance::{DistanceStats, outlier_indices};
use crate::analysis::health::{NetworkHealth, assess_health};
use crate::ingest::NodeId;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

pub const MIN_RECOMMENDED_NODES: usize = 3;

/// One anomaly worth an operator's attention.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    HighErrorRate { node: NodeId, error_rate_pct: f64 },
    LowNodeCount { nodes: usize },
    AsymmetricRanging { source: NodeId, target: NodeId },
    DistanceOutliers { count: usize },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::HighErrorRate {
                node,
                error_rate_pct,
            } => write!(f, "Node {node}: High error rate ({error_rate_pct:.1}%)"),
            Issue::LowNodeCount { nodes } => write!(
                f,
                "Only {nodes} nodes detected (minimum {MIN_RECOMMENDED_NODES} recommended)"
            ),
            Issue::AsymmetricRanging { source, target } => write!(
                f,
                "Asymmetric ranging: Node {source} → {target} works, but not reverse"
            ),
            Issue::DistanceOutliers { count } => {
                write!(f, "Found {count} distance outliers (>3σ from mean)")
            }
        }
    }
}

/// Everything the detector concluded about one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Findings {
    pub health: NetworkHealth,
    pub distance: Option<DistanceStats>,
    /// Indices into the snapshot's range history.
    pub outliers: Vec<usize>,
    pub issues: Vec<Issue>,
}

pub fn detect_issues(snapshot: &SwarmSnapshot) -> Findings {
    let mut issues = Vec::new();

    for (node, stats) in &snapshot.nodes {
        // strictly more than 10%
        if stats.range_count > 0 && stats.error_count.saturating_mul(10) > stats.range_count {
            issues.push(Issue::HighErrorRate {
                node: *node,
                error_rate_pct: stats.error_count as f64 * 100.0 / stats.range_count as f64,
            });
        }
    }

    if snapshot.nodes.len() < MIN_RECOMMENDED_NODES {
        issues.push(Issue::LowNodeCount {
            nodes: snapshot.nodes.len(),
        });
    }

    issues.extend(
        asymmetric_pairs(&snapshot.cells)
            .into_iter()
            .map(|(source, target)| Issue::AsymmetricRanging { source, target }),
    );

    let distances = snapshot.distances();
    let outliers = outlier_indices(&distances);
    if !outliers.is_empty() {
        issues.push(Issue::DistanceOutliers {
            count: outliers.len(),
        });
    }

    Findings {
        health: assess_health(
            snapshot.total_ranges(),
            snapshot.total_errors(),
            snapshot.total_disconnects(),
        ),
        distance: DistanceStats::from_distances(&distances),
        outliers,
        issues,
    }
}

/// Directed pairs with data in one direction only, ordered by pair.
pub fn asymmetric_pairs(cells: &[CellView]) -> Vec<(NodeId, NodeId)> {
    let present: HashSet<(NodeId, NodeId)> = cells.iter().map(|c| (c.source, c.target)).collect();

    present
        .iter()
        .filter(|(source, target)| !present.contains(&(*target, *source)))
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
