use crate::stats::DistributionStats;

/// Converts `x` to a z-score against `stats`.
///
/// A degenerate distribution (zero standard deviation) has no spread to
/// measure against, so every mark sits at the mean: the z-score is 0.
pub fn z_score(x: f64, stats: &DistributionStats) -> f64 {
    if stats.is_degenerate() {
        return 0.0;
    }
    (x - stats.mean) / stats.std_dev
}

/// Z-scores of every mark, index-aligned with `marks`.
pub fn z_scores(marks: &[f64], stats: &DistributionStats) -> Vec<f64> {
    marks.iter().map(|&x| z_score(x, stats)).collect()
}
