//! Deterministic greedy construction.
//!
//! Repeatedly ranks the unplaced jobs with a scoring strategy and appends the
//! best-ranked job that keeps the ordering feasible. Stops early when no
//! unplaced job can follow the current prefix.
//!
//! # Complexity
//!
//! O(n²) evaluations in the worst case, each O(n + arcs).

use super::builder::{construct, extended, BuildResult};
use crate::evaluation::first_feasible;
use crate::models::Instance;
use crate::scoring::ScoringStrategy;

/// Builds an ordering greedily from `initial_prefix` (may be empty).
///
/// A non-empty prefix must itself be feasible, otherwise the result has
/// status [`InfeasiblePrefix`](super::BuildStatus::InfeasiblePrefix) and
/// nothing is appended. Callers must check
/// [`BuildResult::is_complete`] before treating the ordering as a solution.
///
/// # Examples
///
/// ```
/// use u_sequencing::models::Instance;
/// use u_sequencing::scoring::EarliestFinish;
/// use u_sequencing::constructive::greedy_build;
///
/// let inst = Instance::from_rows(
///     vec![2.0, 3.0, 1.0],
///     vec![vec![0.0; 3]; 3],
///     vec![vec![-1.0; 3]; 3],
/// )
/// .unwrap();
///
/// let result = greedy_build(&inst, &EarliestFinish, &[]);
/// assert!(result.is_complete());
/// assert_eq!(result.ordering, vec![2, 0, 1]);
/// assert_eq!(result.makespan(), Some(6.0));
/// ```
pub fn greedy_build<S>(instance: &Instance, strategy: &S, initial_prefix: &[usize]) -> BuildResult
where
    S: ScoringStrategy + ?Sized,
{
    construct(instance, strategy, initial_prefix, |evaluator, ordering, ranked| {
        first_feasible(
            evaluator,
            ranked.into_iter().map(|(job, _)| extended(ordering, job)),
        )
    })
}
