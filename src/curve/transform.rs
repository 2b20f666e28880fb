use crate::curve::normalize::z_score;
use crate::curve::types::{ComparisonRow, ScaleFactor};
use crate::stats::DistributionStats;

/// Linear curve fixed by one distribution and one scale factor.
///
/// The same instance curves the whole dataset and any probe, so both go
/// through identical arithmetic.
#[derive(Debug, Clone, Copy)]
pub struct Transformer {
    stats: DistributionStats,
    scale: f64,
    target_mean: f64,
    lower_bound: f64,
    upper_bound: f64,
}

impl Transformer {
    pub fn new(
        stats: DistributionStats,
        scale: &ScaleFactor,
        target_mean: f64,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Self {
        Self {
            stats,
            scale: scale.value,
            target_mean,
            lower_bound,
            upper_bound,
        }
    }

    /// `clip(z(x) * scale + target_mean, lower, upper)`; clipping is last.
    pub fn curve(&self, x: f64) -> f64 {
        let shifted = z_score(x, &self.stats) * self.scale + self.target_mean;
        shifted.clamp(self.lower_bound, self.upper_bound)
    }

    pub fn curve_all(&self, marks: &[f64]) -> Vec<f64> {
        marks.iter().map(|&x| self.curve(x)).collect()
    }
}

/// Pairs original and curved marks, ordered by the original mark.
///
/// The sort is stable, so equal raw marks keep their input order.
pub fn comparison_series(original: &[f64], curved: &[f64]) -> Vec<ComparisonRow> {
    let mut order: Vec<usize> = (0..original.len().min(curved.len())).collect();
    order.sort_by(|&a, &b| original[a].total_cmp(&original[b]));

    order
        .into_iter()
        .enumerate()
        .map(|(position, index)| ComparisonRow {
            position,
            index,
            original: original[index],
            curved: curved[index],
        })
        .collect()
}
