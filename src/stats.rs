use serde::Serialize;

use crate::curve::utility::{mean, stddev};

/// Summary of a mark distribution.
///
/// `std_dev` is always the population standard deviation (divides by N).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DistributionStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl DistributionStats {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let m = mean(values);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        DistributionStats {
            count: values.len(),
            mean: m,
            std_dev: stddev(values, m),
            min,
            max,
        }
    }

    /// `true` when every value is identical, so z-scores are undefined.
    ///
    /// Compares the extremes as well as the spread: the mean of identical
    /// non-representable values can round away from them and leave a tiny
    /// non-zero standard deviation.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max || self.std_dev == 0.0
    }
}

/// Fraction (0.0–1.0) of `values` at or above `threshold`.
pub fn share_at_or_above(values: &[f64], threshold: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let count = values.iter().filter(|&&v| v >= threshold).count();
    count as f64 / values.len() as f64
}
