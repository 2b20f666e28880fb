//! Grading policy: the threshold grade, the valid mark range and the bands
//! the curve parameters must fall within.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::curve::error::CurveError;
use crate::curve::types::CurveParameters;

/// Mark (out of 5) from which the H1 cap applies.
pub const H1_THRESHOLD: f64 = 4.0;

pub const MIN_MARK: f64 = 0.0;
pub const MAX_MARK: f64 = 5.0;

/// Bounds and bands for a curving run.
///
/// Stored as a JSON object on disk; every field is optional and falls back
/// to the MBS policy:
/// ```json
/// {
///   "threshold": 4.0,
///   "lower_bound": 0.0,
///   "upper_bound": 5.0,
///   "target_mean_band": [3.70, 3.80],
///   "max_above_threshold_band": [0.20, 0.30]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CurvePolicy {
    pub threshold: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub target_mean_band: (f64, f64),
    pub max_above_threshold_band: (f64, f64),
}

impl Default for CurvePolicy {
    fn default() -> Self {
        Self {
            threshold: H1_THRESHOLD,
            lower_bound: MIN_MARK,
            upper_bound: MAX_MARK,
            target_mean_band: (3.70, 3.80),
            max_above_threshold_band: (0.20, 0.30),
        }
    }
}

impl CurvePolicy {
    /// Loads the policy from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read policy file '{path}'"))?;
        let policy: CurvePolicy = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse policy file '{path}'"))?;
        policy.check_bounds()?;
        Ok(policy)
    }

    /// Checks that the bounds form a finite, non-empty range and that the
    /// threshold is finite.
    pub fn check_bounds(&self) -> Result<(), CurveError> {
        if !self.threshold.is_finite() {
            return Err(CurveError::InvalidParameters(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        if !(self.lower_bound.is_finite()
            && self.upper_bound.is_finite()
            && self.lower_bound < self.upper_bound)
        {
            return Err(CurveError::InvalidParameters(format!(
                "lower bound {} must be below upper bound {}",
                self.lower_bound, self.upper_bound
            )));
        }
        Ok(())
    }

    /// `true` when `mark` lies inside the valid mark range.
    pub fn in_range(&self, mark: f64) -> bool {
        mark >= self.lower_bound && mark <= self.upper_bound
    }

    /// Checks `params` against the allowed bands.
    ///
    /// The engine itself accepts any parameters it can compute with; this is
    /// the extra gate a policy-facing caller applies before curving.
    pub fn validate(&self, params: &CurveParameters) -> Result<(), CurveError> {
        let (lo, hi) = self.target_mean_band;
        if params.target_mean() < lo - 1e-9 || params.target_mean() > hi + 1e-9 {
            return Err(CurveError::InvalidParameters(format!(
                "target mean {:.2} is outside the policy band {lo:.2}–{hi:.2}",
                params.target_mean()
            )));
        }

        let (lo, hi) = self.max_above_threshold_band;
        let p = params.max_above_threshold_fraction();
        if p < lo - 1e-9 || p > hi + 1e-9 {
            return Err(CurveError::InvalidParameters(format!(
                "cap of {:.0}% is outside the policy band {:.0}%–{:.0}%",
                p * 100.0,
                lo * 100.0,
                hi * 100.0
            )));
        }

        Ok(())
    }
}
