//! Candidate scans shared by the builders and the local search operators.
//!
//! Every search step in this crate has the same shape: generate candidate
//! orderings lazily, evaluate each, keep the first (or the best) one whose
//! verdict passes an acceptance test. Candidates past the first accepted one
//! are never generated.

use super::Evaluator;
use crate::models::Verdict;

/// Returns the first candidate whose verdict satisfies `accept`.
///
/// # Examples
///
/// ```
/// use u_sequencing::models::Instance;
/// use u_sequencing::evaluation::{first_accepted, Evaluator};
///
/// let inst = Instance::from_rows(
///     vec![1.0, 1.0],
///     vec![vec![0.0; 2]; 2],
///     vec![vec![-1.0, 5.0], vec![-1.0, -1.0]],
/// )
/// .unwrap();
/// let eval = Evaluator::new(&inst);
///
/// // [1] alone misses its predecessor; [0] is the first feasible start.
/// let found = first_accepted(&eval, [vec![1], vec![0]], |v| v.is_feasible());
/// assert_eq!(found.map(|(o, _)| o), Some(vec![0]));
/// ```
pub fn first_accepted<I, F>(
    evaluator: &Evaluator<'_>,
    candidates: I,
    mut accept: F,
) -> Option<(Vec<usize>, Verdict)>
where
    I: IntoIterator<Item = Vec<usize>>,
    F: FnMut(&Verdict) -> bool,
{
    candidates.into_iter().find_map(|candidate| {
        let verdict = evaluator.evaluate(&candidate);
        accept(&verdict).then_some((candidate, verdict))
    })
}

/// Returns the first feasible candidate.
pub fn first_feasible<I>(evaluator: &Evaluator<'_>, candidates: I) -> Option<(Vec<usize>, Verdict)>
where
    I: IntoIterator<Item = Vec<usize>>,
{
    first_accepted(evaluator, candidates, Verdict::is_feasible)
}

/// Scans every candidate and returns the accepted one with the smallest
/// makespan. Ties keep the earliest candidate.
pub fn best_accepted<I, F>(
    evaluator: &Evaluator<'_>,
    candidates: I,
    mut accept: F,
) -> Option<(Vec<usize>, Verdict)>
where
    I: IntoIterator<Item = Vec<usize>>,
    F: FnMut(&Verdict) -> bool,
{
    let mut best: Option<(Vec<usize>, Verdict, f64)> = None;
    for candidate in candidates {
        let verdict = evaluator.evaluate(&candidate);
        if !accept(&verdict) {
            continue;
        }
        let Some(makespan) = verdict.makespan() else {
            continue;
        };
        if best.as_ref().is_none_or(|b| makespan < b.2) {
            best = Some((candidate, verdict, makespan));
        }
    }
    best.map(|(candidate, verdict, _)| (candidate, verdict))
}
