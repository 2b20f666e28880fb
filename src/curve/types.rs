//! Value types flowing through the curving pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::curve::error::CurveError;
use crate::stats::DistributionStats;

/// Ordered raw marks, one per student. Never empty, never non-finite.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSet {
    marks: Vec<f64>,
}

impl ScoreSet {
    pub fn new(marks: Vec<f64>) -> Result<Self, CurveError> {
        if marks.is_empty() {
            return Err(CurveError::EmptyScoreSet);
        }
        if let Some((idx, value)) = marks.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(CurveError::UnparseableMark {
                row: idx + 1,
                value: value.to_string(),
            });
        }
        Ok(Self { marks })
    }

    pub fn marks(&self) -> &[f64] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

/// Target mean and cap on the share of curved marks at or above the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveParameters {
    target_mean: f64,
    max_above_threshold_fraction: f64,
}

impl CurveParameters {
    pub fn new(target_mean: f64, max_above_threshold_fraction: f64) -> Result<Self, CurveError> {
        if !target_mean.is_finite() {
            return Err(CurveError::InvalidParameters(format!(
                "target mean must be finite, got {target_mean}"
            )));
        }
        if !(max_above_threshold_fraction > 0.0 && max_above_threshold_fraction < 1.0) {
            return Err(CurveError::InvalidParameters(format!(
                "fraction above threshold must lie strictly between 0 and 1, got {max_above_threshold_fraction}"
            )));
        }
        Ok(Self {
            target_mean,
            max_above_threshold_fraction,
        })
    }

    /// Builds parameters from a whole-percent cap such as `30`.
    pub fn from_percent(target_mean: f64, max_above_threshold_pct: u32) -> Result<Self, CurveError> {
        Self::new(target_mean, max_above_threshold_pct as f64 / 100.0)
    }

    pub fn target_mean(&self) -> f64 {
        self.target_mean
    }

    pub fn max_above_threshold_fraction(&self) -> f64 {
        self.max_above_threshold_fraction
    }
}

/// Standard deviation the curved distribution is given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleFactor {
    pub z_cutoff: f64,
    pub value: f64,
    /// Set when `z_cutoff` was zero and `value` fell back to 1.
    pub degenerate: bool,
}

/// Defined substitutes for undefined arithmetic, reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// Every raw mark was identical; all z-scores were taken as 0.
    DegenerateDistribution,
    /// The cutoff z-score was 0; the scale factor was taken as 1.
    DegenerateCutoff,
}

/// Curved mark and standing of a single looked-up student.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub raw: f64,
    pub curved: f64,
    /// 1-based, shared between tied marks.
    pub rank: usize,
    pub higher_count: usize,
    pub tie_count: usize,
    pub total: usize,
    /// Whether the curved mark meets the policy threshold.
    pub at_or_above_threshold: bool,
}

/// One point of the original-vs-curved comparison, ordered by raw mark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub position: usize,
    pub index: usize,
    pub original: f64,
    pub curved: f64,
}

/// Everything a curving run produces.
#[derive(Debug, Clone, Serialize)]
pub struct CurveReport {
    pub generated_at: DateTime<Utc>,
    pub parameters: CurveParameters,
    pub threshold: f64,
    pub original: DistributionStats,
    pub curved: DistributionStats,
    pub scale: ScaleFactor,
    pub fallbacks: Vec<Fallback>,
    pub original_share_at_or_above: f64,
    pub curved_share_at_or_above: f64,
    pub curved_marks: Vec<f64>,
    pub probe: Option<ProbeResult>,
}
