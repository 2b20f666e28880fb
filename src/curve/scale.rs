//! Scale solver: the standard deviation a curved distribution needs so that
//! a given share of a normal population lands at or above the threshold.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::curve::error::CurveError;
use crate::curve::types::{CurveParameters, ScaleFactor};

/// Cutoffs closer to zero than this are treated as zero.
pub const ZERO_CUTOFF_TOLERANCE: f64 = 1e-12;

/// Inverse of the standard normal CDF: the z below which fraction `p` of a
/// standard normal distribution lies.
///
/// Returns `-inf`/`+inf` at 0 and 1, and `NaN` outside [0, 1].
pub fn inverse_standard_normal_cdf(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }
    Normal::standard().inverse_cdf(p)
}

/// Solves for the curved standard deviation.
///
/// `scale = (threshold - target_mean) / z_cutoff` with
/// `z_cutoff = Φ⁻¹(1 - p)`. A zero cutoff (only at `p = 0.5`, within
/// [`ZERO_CUTOFF_TOLERANCE`]) falls back to a scale of exactly 1. A negative
/// scale would reverse every standing and is rejected.
pub fn solve_scale_factor(
    params: &CurveParameters,
    threshold: f64,
) -> Result<ScaleFactor, CurveError> {
    let z_cutoff = inverse_standard_normal_cdf(1.0 - params.max_above_threshold_fraction());

    if z_cutoff.abs() < ZERO_CUTOFF_TOLERANCE {
        return Ok(ScaleFactor {
            z_cutoff,
            value: 1.0,
            degenerate: true,
        });
    }

    let value = (threshold - params.target_mean()) / z_cutoff;
    if !value.is_finite() || value < 0.0 {
        return Err(CurveError::InvalidParameters(format!(
            "target mean {} with a {:.0}% cap above {threshold} gives scale factor {value:.4}, which would reverse the ranking",
            params.target_mean(),
            params.max_above_threshold_fraction() * 100.0
        )));
    }

    Ok(ScaleFactor {
        z_cutoff,
        value,
        degenerate: false,
    })
}
