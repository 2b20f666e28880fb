use chrono::Utc;
use tracing::{debug, warn};

use crate::curve::error::CurveError;
use crate::curve::policy::CurvePolicy;
use crate::curve::rank::rank_against;
use crate::curve::scale::solve_scale_factor;
use crate::curve::transform::Transformer;
use crate::curve::types::{CurveParameters, CurveReport, Fallback, ProbeResult, ScoreSet};
use crate::stats::{DistributionStats, share_at_or_above};

/// Runs the normalize → solve → transform → rank pipeline under one policy.
///
/// Holds no state between runs; every call is a pure function of its inputs.
#[derive(Debug, Clone, Default)]
pub struct CurveEngine {
    policy: CurvePolicy,
}

impl CurveEngine {
    /// # Errors
    ///
    /// [`CurveError::InvalidParameters`] when the policy bounds are not a
    /// finite, non-empty range.
    pub fn new(policy: CurvePolicy) -> Result<Self, CurveError> {
        policy.check_bounds()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &CurvePolicy {
        &self.policy
    }

    /// Curves `scores` and, when a probe was submitted, looks it up.
    ///
    /// # Errors
    ///
    /// [`CurveError::OutOfRangeProbe`] when the probe lies outside the policy
    /// bounds, [`CurveError::InvalidParameters`] when no order-preserving
    /// scale factor exists for `params`.
    #[tracing::instrument(
        skip_all,
        fields(
            n = scores.len(),
            target_mean = params.target_mean(),
            cap = params.max_above_threshold_fraction(),
            probe = ?probe,
        )
    )]
    pub fn run(
        &self,
        scores: &ScoreSet,
        params: &CurveParameters,
        probe: Option<f64>,
    ) -> Result<CurveReport, CurveError> {
        if let Some(mark) = probe {
            self.check_probe(mark)?;
        }

        let mut fallbacks = Vec::new();

        let original = DistributionStats::from_values(scores.marks());
        debug!(mean = original.mean, std_dev = original.std_dev, "Original distribution");
        if original.is_degenerate() {
            warn!(
                mean = original.mean,
                "All marks identical; every mark curves to the target mean"
            );
            fallbacks.push(Fallback::DegenerateDistribution);
        }

        let scale = solve_scale_factor(params, self.policy.threshold)?;
        debug!(z_cutoff = scale.z_cutoff, scale = scale.value, "Scale factor solved");
        if scale.degenerate {
            warn!("Cutoff z-score is zero; using a scale factor of 1");
            fallbacks.push(Fallback::DegenerateCutoff);
        }

        let transformer = Transformer::new(
            original,
            &scale,
            params.target_mean(),
            self.policy.lower_bound,
            self.policy.upper_bound,
        );
        let curved_marks = transformer.curve_all(scores.marks());
        let curved = DistributionStats::from_values(&curved_marks);

        let probe = probe.map(|raw| {
            let value = transformer.curve(raw);
            let standing = rank_against(value, &curved_marks);
            debug!(raw, curved = value, rank = standing.rank, "Probe looked up");
            ProbeResult {
                raw,
                curved: value,
                rank: standing.rank,
                higher_count: standing.higher_count,
                tie_count: standing.tie_count,
                total: curved_marks.len(),
                at_or_above_threshold: value >= self.policy.threshold,
            }
        });

        Ok(CurveReport {
            generated_at: Utc::now(),
            parameters: *params,
            threshold: self.policy.threshold,
            original,
            curved,
            scale,
            fallbacks,
            original_share_at_or_above: share_at_or_above(scores.marks(), self.policy.threshold),
            curved_share_at_or_above: share_at_or_above(&curved_marks, self.policy.threshold),
            curved_marks,
            probe,
        })
    }

    fn check_probe(&self, mark: f64) -> Result<(), CurveError> {
        if self.policy.in_range(mark) {
            Ok(())
        } else {
            Err(CurveError::OutOfRangeProbe {
                value: mark,
                lower: self.policy.lower_bound,
                upper: self.policy.upper_bound,
            })
        }
    }
}
