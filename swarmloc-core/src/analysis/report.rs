use crate::aggregate::{NodeStats, SwarmSnapshot};
use crate::analysis::distance::mean_and_std;
use crate::analysis::health::HealthScore;
use crate::analysis::issues::{Findings, detect_issues};
use crate::ingest::NodeId;
use crate::render::{Highlighter, render_grid};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

const HEAVY_RULE_WIDTH: usize = 70;
const PAIR_COLUMN_WIDTH: usize = 15;

/// Distance statistics for one directed pair over the whole history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairSummary {
    pub source: NodeId,
    pub target: NodeId,
    pub samples: usize,
    pub mean_m: f64,
    pub std_m: f64,
}

impl PairSummary {
    fn cell_text(&self) -> String {
        if self.samples > 1 {
            format!("{:.2}±{:.2}m", self.mean_m, self.std_m)
        } else {
            format!("{:.2}m", self.mean_m)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub total_ranges: usize,
    pub total_events: usize,
    pub nodes: BTreeMap<NodeId, NodeStats>,
    pub pairs: Vec<PairSummary>,
    #[serde(flatten)]
    pub findings: Findings,
}

impl AnalysisReport {
    pub fn build(snapshot: &SwarmSnapshot) -> Self {
        Self {
            total_ranges: snapshot.ranges.len(),
            total_events: snapshot.events.len(),
            nodes: snapshot.nodes.clone(),
            pairs: pair_summaries(snapshot),
            findings: detect_issues(snapshot),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn render(&self, h: &dyn Highlighter) -> String {
        let heavy = "=".repeat(HEAVY_RULE_WIDTH);
        let mut out = String::new();

        out.push_str(&format!(
            "\n{heavy}\n{}\n{heavy}\n",
            h.heading("SWARM TEST ANALYSIS REPORT")
        ));

        section(&mut out, h, "OVERALL STATISTICS");
        out.push_str(&format!("Total ranges recorded: {}\n", self.total_ranges));
        out.push_str(&format!("Total events: {}\n", self.total_events));
        out.push_str(&format!("Active nodes: {}\n", self.nodes.len()));

        section(&mut out, h, "PER-NODE STATISTICS");
        self.render_node_table(&mut out);

        section(&mut out, h, "RANGING MATRIX");
        self.render_pairs(&mut out);

        section(&mut out, h, "DISTANCE STATISTICS");
        self.render_distances(&mut out);

        section(&mut out, h, "NETWORK HEALTH");
        self.render_health(&mut out, h);

        section(&mut out, h, "ISSUES DETECTED");
        self.render_issues(&mut out, h);

        out.push_str(&format!("\n{heavy}\n"));
        out
    }

    fn render_node_table(&self, out: &mut String) {
        out.push_str(&format!(
            "{:<8} {:<12} {:<14} {:<14} {:<8}\n",
            "Node", "Ranges", "Discoveries", "Disconnects", "Errors"
        ));
        out.push_str(&format!("{}\n", "-".repeat(HEAVY_RULE_WIDTH)));

        for (node, stats) in &self.nodes {
            out.push_str(&format!(
                "{:<8} {:<12} {:<14} {:<14} {:<8}\n",
                node.to_string(),
                stats.range_count,
                stats.discovery_count,
                stats.disconnect_count,
                stats.error_count
            ));
        }
    }

    fn render_pairs(&self, out: &mut String) {
        let nodes: Vec<NodeId> = self
            .pairs
            .iter()
            .flat_map(|p| [p.source, p.target])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if nodes.is_empty() {
            out.push_str("No ranging data available\n");
            return;
        }

        let by_pair: BTreeMap<(NodeId, NodeId), &PairSummary> = self
            .pairs
            .iter()
            .map(|p| ((p.source, p.target), p))
            .collect();

        out.push_str(&render_grid(&nodes, PAIR_COLUMN_WIDTH, |source, target| {
            by_pair
                .get(&(source, target))
                .map(|p| p.cell_text())
                .unwrap_or_else(|| "N/A".to_string())
        }));
    }

    fn render_distances(&self, out: &mut String) {
        let Some(d) = &self.findings.distance else {
            out.push_str("No range data available\n");
            return;
        };

        out.push_str(&format!("Count: {}\n", d.count));
        out.push_str(&format!("Mean: {:.3} m\n", d.mean));
        out.push_str(&format!("Std Dev: {:.3} m\n", d.std_dev));
        out.push_str(&format!("Min: {:.3} m\n", d.min));
        out.push_str(&format!("Max: {:.3} m\n", d.max));
        out.push_str(&format!("Median: {:.3} m\n", d.median));
    }

    fn render_health(&self, out: &mut String, h: &dyn Highlighter) {
        let health = &self.findings.health;

        let (Some(error_rate), Some(disconnect_rate)) =
            (health.error_rate_pct, health.disconnect_rate_pct)
        else {
            out.push_str(&h.warn(&format!("Network health: {}", health.score)));
            out.push('\n');
            return;
        };

        out.push_str(&format!("Total successful ranges: {}\n", health.total_ranges));
        out.push_str(&format!("Total errors: {}\n", health.total_errors));
        out.push_str(&format!("Total disconnects: {}\n", health.total_disconnects));
        out.push_str(&format!("Error rate: {error_rate:.2}%\n"));
        out.push_str(&format!("Disconnect rate: {disconnect_rate:.2}%\n"));

        let verdict = format!("Network health: {}", health.score);
        let line = match health.score {
            HealthScore::Good => h.good(&format!("✓ {verdict}")),
            HealthScore::Fair => h.warn(&format!("⚠ {verdict}")),
            HealthScore::Poor | HealthScore::InsufficientData => h.bad(&format!("✗ {verdict}")),
        };
        out.push_str(&format!("\n{line}\n"));
    }

    fn render_issues(&self, out: &mut String, h: &dyn Highlighter) {
        if self.findings.issues.is_empty() {
            out.push_str(&h.good("✓ No major issues detected"));
            out.push('\n');
            return;
        }

        for issue in &self.findings.issues {
            out.push_str(&h.warn(&format!("⚠ {issue}")));
            out.push('\n');
        }
    }
}

fn section(out: &mut String, h: &dyn Highlighter, title: &str) {
    out.push_str(&format!(
        "\n{}\n{}\n",
        h.heading(title),
        "-".repeat(HEAVY_RULE_WIDTH)
    ));
}

/// Per-pair distance summaries, keyed on the record's own source and the
/// canonical target.
pub fn pair_summaries(snapshot: &SwarmSnapshot) -> Vec<PairSummary> {
    let mut grouped: BTreeMap<(NodeId, NodeId), Vec<f64>> = BTreeMap::new();
    for record in &snapshot.ranges {
        let m = &record.measurement;
        grouped
            .entry((m.source, m.target))
            .or_default()
            .push(m.distance_m);
    }

    grouped
        .into_iter()
        .filter_map(|((source, target), distances)| {
            let (mean_m, std_m) = mean_and_std(&distances)?;
            Some(PairSummary {
                source,
                target,
                samples: distances.len(),
                mean_m,
                std_m,
            })
        })
        .collect()
}
