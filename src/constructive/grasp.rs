//! Randomized greedy construction (GRASP).
//!
//! # Algorithm
//!
//! Same loop as the greedy builder, but each step first forms a restricted
//! candidate list (RCL) from the head of the ranking, tries its members in
//! random order, and only then falls back to the rest of the ranking in rank
//! order.
//!
//! # Reference
//!
//! Feo, T.A. & Resende, M.G.C. (1995). "Greedy Randomized Adaptive Search
//! Procedures", *Journal of Global Optimization* 6, 109-133.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::builder::{construct, extended, BuildResult};
use crate::evaluation::{first_feasible, TOLERANCE};
use crate::models::Instance;
use crate::scoring::ScoringStrategy;

/// How the restricted candidate list is cut from the ranking.
///
/// # Examples
///
/// ```
/// use u_sequencing::constructive::RclPolicy;
///
/// let ranked = [(4, 1.0), (0, 2.0), (2, 5.0), (1, 9.0)];
/// assert_eq!(RclPolicy::Size(2).restrict(&ranked), 2);
/// // threshold = 1 + 0.5 * (9 - 1) = 5
/// assert_eq!(RclPolicy::Threshold { alpha: 0.5 }.restrict(&ranked), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RclPolicy {
    /// The top `k` ranked candidates.
    Size(usize),
    /// Candidates scoring at most `min + alpha * (max - min)`.
    Threshold {
        /// Greediness in `[0, 1]`; 0 is pure greedy, 1 is uniform random.
        alpha: f64,
    },
}

impl Default for RclPolicy {
    fn default() -> Self {
        RclPolicy::Threshold { alpha: 0.3 }
    }
}

impl RclPolicy {
    /// Validates the policy parameters.
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            RclPolicy::Size(0) => Err("RCL size must be at least 1".into()),
            RclPolicy::Threshold { alpha } if !(0.0..=1.0).contains(&alpha) => {
                Err(format!("RCL alpha must be in [0, 1], got {alpha}"))
            }
            _ => Ok(()),
        }
    }

    /// Returns `true` if this policy makes no random choice.
    pub fn is_greedy(&self) -> bool {
        match *self {
            RclPolicy::Size(k) => k <= 1,
            RclPolicy::Threshold { alpha } => alpha <= 0.0,
        }
    }

    /// Number of leading entries of `ranked` (sorted ascending) in the RCL.
    ///
    /// Never below 1 for a non-empty ranking.
    pub fn restrict(&self, ranked: &[(usize, f64)]) -> usize {
        let (Some(first), Some(last)) = (ranked.first(), ranked.last()) else {
            return 0;
        };
        let len = match *self {
            RclPolicy::Size(k) => k.min(ranked.len()),
            RclPolicy::Threshold { alpha } => {
                let (min_v, max_v) = (first.1, last.1);
                if max_v - min_v <= TOLERANCE {
                    ranked.len()
                } else {
                    let threshold = min_v + alpha * (max_v - min_v);
                    ranked
                        .iter()
                        .take_while(|(_, v)| *v <= threshold + TOLERANCE)
                        .count()
                }
            }
        };
        len.max(1)
    }
}

/// Builds an ordering with randomized greedy selection.
///
/// Candidates inside the RCL are tried in a random permutation drawn from
/// `rng`; if none keeps the ordering feasible, the remaining candidates are
/// tried in rank order before the step is declared blocked. A greedy policy
/// (`Size(1)` or `alpha = 0`) skips the permutation and reproduces
/// [`greedy_build`](super::greedy_build) exactly.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_sequencing::models::Instance;
/// use u_sequencing::scoring::EarliestFinish;
/// use u_sequencing::constructive::{grasp_build, RclPolicy};
///
/// let inst = Instance::from_rows(
///     vec![2.0, 3.0, 1.0, 4.0],
///     vec![vec![0.0; 4]; 4],
///     vec![vec![-1.0; 4]; 4],
/// )
/// .unwrap();
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let result = grasp_build(&inst, &EarliestFinish, &[], RclPolicy::Size(2), &mut rng);
/// assert!(result.is_complete());
/// assert_eq!(result.makespan(), Some(10.0));
/// ```
pub fn grasp_build<S, R>(
    instance: &Instance,
    strategy: &S,
    initial_prefix: &[usize],
    rcl: RclPolicy,
    rng: &mut R,
) -> BuildResult
where
    S: ScoringStrategy + ?Sized,
    R: Rng + ?Sized,
{
    let greedy = rcl.is_greedy();
    construct(instance, strategy, initial_prefix, |evaluator, ordering, ranked| {
        let cut = rcl.restrict(&ranked);
        let mut pool: Vec<usize> = ranked[..cut].iter().map(|&(job, _)| job).collect();
        if !greedy {
            pool.shuffle(&mut *rng);
        }
        let fallback = ranked[cut..].iter().map(|&(job, _)| job);
        first_feasible(
            evaluator,
            pool.into_iter()
                .chain(fallback)
                .map(|job| extended(ordering, job)),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructive::greedy_build;
    use crate::scoring::{EarliestFinish, EarliestStart, Strategy};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn instance() -> Instance {
        // 5 jobs, 0 -> 4 with delay 1, uneven setups.
        let mut d = vec![vec![-1.0; 5]; 5];
        d[0][4] = 1.0;
        let s = vec![
            vec![0.0, 2.0, 1.0, 3.0, 1.0],
            vec![1.0, 0.0, 2.0, 1.0, 2.0],
            vec![3.0, 1.0, 0.0, 2.0, 1.0],
            vec![2.0, 2.0, 1.0, 0.0, 3.0],
            vec![1.0, 3.0, 2.0, 1.0, 0.0],
        ];
        Instance::from_rows(vec![4.0, 2.0, 3.0, 1.0, 2.0], s, d).expect("valid")
    }

    #[test]
    fn test_restrict_threshold_flat() {
        let ranked = [(0, 3.0), (1, 3.0), (2, 3.0)];
        assert_eq!(RclPolicy::Threshold { alpha: 0.0 }.restrict(&ranked), 3);
    }

    #[test]
    fn test_restrict_threshold_zero_alpha_keeps_ties() {
        let ranked = [(0, 1.0), (3, 1.0), (2, 4.0)];
        assert_eq!(RclPolicy::Threshold { alpha: 0.0 }.restrict(&ranked), 2);
        assert_eq!(RclPolicy::Threshold { alpha: 1.0 }.restrict(&ranked), 3);
    }

    #[test]
    fn test_restrict_size_clamped() {
        let ranked = [(0, 1.0), (1, 2.0)];
        assert_eq!(RclPolicy::Size(5).restrict(&ranked), 2);
        assert_eq!(RclPolicy::Size(1).restrict(&ranked), 1);
        assert_eq!(RclPolicy::Size(3).restrict(&[]), 0);
    }

    #[test]
    fn test_validate() {
        assert!(RclPolicy::default().validate().is_ok());
        assert!(RclPolicy::Size(0).validate().is_err());
        assert!(RclPolicy::Threshold { alpha: 1.5 }.validate().is_err());
        assert!(RclPolicy::Threshold { alpha: -0.1 }.validate().is_err());
    }

    #[test]
    fn test_alpha_zero_matches_greedy() {
        let inst = instance();
        for strategy in Strategy::ALL {
            let greedy = greedy_build(&inst, &strategy, &[]);
            for seed in 0..5 {
                let mut rng = StdRng::seed_from_u64(seed);
                let grasp = grasp_build(
                    &inst,
                    &strategy,
                    &[],
                    RclPolicy::Threshold { alpha: 0.0 },
                    &mut rng,
                );
                assert_eq!(grasp.ordering, greedy.ordering);
            }
        }
    }

    #[test]
    fn test_seed_reproducible() {
        let inst = instance();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            grasp_build(&inst, &EarliestStart, &[], RclPolicy::Size(3), &mut rng).ordering
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_random_orderings_feasible_and_diverse() {
        let inst = instance();
        let mut seen = HashSet::new();
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = grasp_build(
                &inst,
                &EarliestFinish,
                &[],
                RclPolicy::Threshold { alpha: 1.0 },
                &mut rng,
            );
            assert!(result.is_complete());
            assert!(result.verdict.is_feasible());
            seen.insert(result.ordering);
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_fallback_beyond_rcl() {
        // Job 1 ranks first and alone in the RCL but needs job 0 placed first.
        let inst = Instance::from_rows(
            vec![5.0, 1.0],
            vec![vec![0.0; 2]; 2],
            vec![vec![-1.0, 0.0], vec![-1.0, -1.0]],
        )
        .expect("valid");
        let mut rng = StdRng::seed_from_u64(0);
        let result = grasp_build(&inst, &EarliestFinish, &[], RclPolicy::Size(1), &mut rng);
        assert_eq!(result.ordering, vec![0, 1]);
    }

    #[test]
    fn test_blocked_by_precedence_cycle() {
        let mut d = vec![vec![-1.0; 3]; 3];
        d[0][1] = 0.0;
        d[1][0] = 0.0;
        let inst = Instance::from_rows(vec![1.0; 3], vec![vec![0.0; 3]; 3], d).expect("valid");
        let mut rng = StdRng::seed_from_u64(5);
        let result = grasp_build(&inst, &EarliestStart, &[], RclPolicy::Size(3), &mut rng);
        assert_eq!(result.ordering, vec![2]);
        assert!(!result.is_complete());
    }
}
