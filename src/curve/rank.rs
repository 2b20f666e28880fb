use crate::curve::utility::is_close;

/// Standing of a curved value against a curved dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing {
    pub rank: usize,
    pub higher_count: usize,
    pub tie_count: usize,
}

/// Ranks `value` among `curved`: one plus the number of marks that are
/// greater than `value` and not within tolerance of it.
///
/// Tied marks share a rank, so the best rank is always 1.
pub fn rank_against(value: f64, curved: &[f64]) -> Standing {
    let mut higher_count = 0;
    let mut tie_count = 0;
    for &c in curved {
        if is_close(c, value) {
            tie_count += 1;
        } else if c > value {
            higher_count += 1;
        }
    }

    Standing {
        rank: higher_count + 1,
        higher_count,
        tie_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_value_above_everything_ranks_first() {
        let standing = rank_against(4.9, &[3.0, 3.5, 4.2]);
        assert_eq!(standing.rank, 1);
        assert_eq!(standing.tie_count, 0);
    }

    #[test]
    fn test_tied_top_ranks_first() {
        let standing = rank_against(4.2, &[3.0, 4.2, 3.5, 4.2]);
        assert_eq!(standing.rank, 1);
        assert_eq!(standing.tie_count, 2);
    }

    #[test]
    fn test_ties_share_rank() {
        let curved = [4.5, 3.5, 3.5, 2.0];
        assert_eq!(rank_against(3.5, &curved).rank, 2);
        assert_eq!(rank_against(2.0, &curved).rank, 4);
        assert_eq!(rank_against(1.0, &curved).rank, 5);
    }

    #[test]
    fn test_floating_drift_counts_as_tie() {
        let drifted = 0.1 + 0.2;
        let standing = rank_against(0.3, &[drifted, 0.1]);
        assert_eq!(standing.rank, 1);
        assert_eq!(standing.tie_count, 1);
    }

    proptest! {
        #[test]
        fn member_rank_is_within_dataset(
            curved in prop::collection::vec(0.0f64..=5.0, 1..50),
            pick in any::<prop::sample::Index>(),
        ) {
            let value = curved[pick.index(curved.len())];
            let standing = rank_against(value, &curved);
            prop_assert!(standing.rank >= 1 && standing.rank <= curved.len());
            prop_assert!(standing.tie_count >= 1);
        }

        #[test]
        fn maximum_ranks_first(curved in prop::collection::vec(0.0f64..=5.0, 1..50)) {
            let max = curved.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(rank_against(max, &curved).rank, 1);
        }
    }
}
