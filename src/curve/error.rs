//! Typed outcomes for everything that can stop a curving request.

use thiserror::Error;

/// Errors surfaced by the curving engine and its input glue.
///
/// None of these are fatal to the process: each one is recoverable by the
/// caller choosing different inputs or reporting that marks are unavailable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// The raw mark column could not be obtained.
    #[error("quiz marks are not available: {0}")]
    DataUnavailable(String),

    /// A value in the mark column is not a number.
    #[error("row {row}: could not parse mark {value:?}")]
    UnparseableMark { row: usize, value: String },

    #[error("the mark column is empty")]
    EmptyScoreSet,

    /// Probe marks outside the valid range are rejected, never clamped.
    #[error("mark {value} is outside the valid range [{lower}, {upper}]")]
    OutOfRangeProbe { value: f64, lower: f64, upper: f64 },

    #[error("invalid curve parameters: {0}")]
    InvalidParameters(String),
}

impl CurveError {
    /// Returns `true` for the conditions a caller should render as
    /// "marks are not available" rather than as a parameter problem.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(
            self,
            CurveError::DataUnavailable(_)
                | CurveError::UnparseableMark { .. }
                | CurveError::EmptyScoreSet
        )
    }
}
