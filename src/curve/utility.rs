/// Relative tolerance used when deciding whether two curved marks tie.
pub const REL_TOLERANCE: f64 = 1e-5;

/// Absolute tolerance used when deciding whether two curved marks tie.
pub const ABS_TOLERANCE: f64 = 1e-8;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation (divides by N) given a
/// pre-computed mean. Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

/// Approximate equality of `a` against the reference value `b`:
/// `|a - b| <= ABS_TOLERANCE + REL_TOLERANCE * |b|`.
pub fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= ABS_TOLERANCE + REL_TOLERANCE * b.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_population_stddev() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let m = mean(&values);
        assert_eq!(m, 3.0);
        // population variance of 1..=5 is 2, sample variance would be 2.5
        assert!((stddev(&values, m) - 2.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_stddev_identical_values() {
        let values = [3.0, 3.0, 3.0];
        assert_eq!(stddev(&values, mean(&values)), 0.0);
    }

    #[test]
    fn test_is_close_tolerances() {
        assert!(is_close(4.0, 4.0));
        assert!(is_close(4.0 + 3e-5, 4.0));
        assert!(!is_close(4.0 + 1e-4, 4.0));
        assert!(is_close(5e-9, 0.0));
        assert!(!is_close(1e-7, 0.0));
    }
}
