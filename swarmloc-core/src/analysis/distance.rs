use serde::Serialize;

/// Flag threshold in standard deviations.
pub const OUTLIER_SIGMA: f64 = 3.0;

/// Fewer readings than this are never flagged.
pub const MIN_OUTLIER_SAMPLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceStats {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

impl DistanceStats {
    pub fn from_distances(values: &[f64]) -> Option<Self> {
        let (mean, std_dev) = mean_and_std(values)?;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            count: values.len(),
            mean,
            std_dev,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            median,
        })
    }
}

/// Mean and population standard deviation; `None` for an empty slice.
pub fn mean_and_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    Some((mean, variance.sqrt()))
}

/// Indices of values more than [`OUTLIER_SIGMA`] standard deviations away
/// from the mean of all other values.
///
/// A single extreme reading inflates the whole-set deviation enough to hide
/// itself, so each value is judged against the rest. Constant input has no
/// outliers.
pub fn outlier_indices(values: &[f64]) -> Vec<usize> {
    // with two readings the rest is a single value and has no spread to judge by
    if values.len() < MIN_OUTLIER_SAMPLES {
        return Vec::new();
    }
    let Some((mean, _)) = mean_and_std(values) else {
        return Vec::new();
    };

    let first = values[0];
    if values.iter().all(|v| *v == first) {
        return Vec::new();
    }

    let n = values.len() as f64;
    let rest = n - 1.0;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();

    values
        .iter()
        .enumerate()
        .filter(|(_, v)| {
            let d = *v - mean;
            let rest_variance = ((ss - d * d) / rest - (d / rest).powi(2)).max(0.0);
            let deviation = d.abs() * n / rest;
            deviation > OUTLIER_SIGMA * rest_variance.sqrt()
        })
        .map(|(i, _)| i)
        .collect()
}
