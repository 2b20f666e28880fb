//! Grade curving.
//!
//! Raw marks are standardized against their own population mean and standard
//! deviation, rescaled so the curved distribution has the target mean and a
//! capped share at or above the threshold grade, clipped to the valid mark
//! range, and ranked with tolerance-aware ties.

pub mod engine;
pub mod error;
pub mod normalize;
pub mod policy;
pub mod rank;
pub mod scale;
pub mod transform;
pub mod types;
pub mod utility;

pub use engine::CurveEngine;
pub use error::CurveError;
pub use policy::CurvePolicy;
pub use types::{CurveParameters, CurveReport, Fallback, ProbeResult, ScoreSet};
