use serde::Serialize;
use std::fmt;

/// Error-rate ceiling for GOOD, in percent of total ranges (inclusive).
pub const GOOD_ERROR_PCT: u64 = 5;
pub const GOOD_DISCONNECT_PCT: u64 = 10;
pub const FAIR_ERROR_PCT: u64 = 10;
pub const FAIR_DISCONNECT_PCT: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthScore {
    Good,
    Fair,
    Poor,
    /// No ranges recorded, so rates are undefined.
    InsufficientData,
}

impl fmt::Display for HealthScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthScore::Good => "GOOD",
            HealthScore::Fair => "FAIR",
            HealthScore::Poor => "POOR",
            HealthScore::InsufficientData => "INSUFFICIENT DATA",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetworkHealth {
    pub total_ranges: u64,
    pub total_errors: u64,
    pub total_disconnects: u64,
    pub error_rate_pct: Option<f64>,
    pub disconnect_rate_pct: Option<f64>,
    pub score: HealthScore,
}

/// Score the swarm from totals over all nodes.
///
/// Thresholds are compared in integer arithmetic so a rate of exactly 5%
/// lands in GOOD regardless of float rounding.
pub fn assess_health(total_ranges: u64, total_errors: u64, total_disconnects: u64) -> NetworkHealth {
    let rate = |count: u64| (total_ranges > 0).then(|| count as f64 * 100.0 / total_ranges as f64);
    let within = |count: u64, pct: u64| {
        u128::from(count) * 100 <= u128::from(total_ranges) * u128::from(pct)
    };

    let score = if total_ranges == 0 {
        HealthScore::InsufficientData
    } else if within(total_errors, GOOD_ERROR_PCT) && within(total_disconnects, GOOD_DISCONNECT_PCT) {
        HealthScore::Good
    } else if within(total_errors, FAIR_ERROR_PCT) && within(total_disconnects, FAIR_DISCONNECT_PCT) {
        HealthScore::Fair
    } else {
        HealthScore::Poor
    };

    NetworkHealth {
        total_ranges,
        total_errors,
        total_disconnects,
        error_rate_pct: rate(total_errors),
        disconnect_rate_pct: rate(total_disconnects),
        score,
    }
}
