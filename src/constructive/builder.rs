//! Shared construction loop.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::evaluation::Evaluator;
use crate::models::{Instance, Verdict, Violation, ViolationType};
use crate::scoring::ScoringStrategy;

/// How a construction run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildStatus {
    /// Every job was placed.
    Complete,
    /// No unplaced job could extend the ordering feasibly.
    ///
    /// The returned ordering is a maximal feasible prefix.
    Blocked {
        /// Jobs placed before the builder got stuck.
        placed: usize,
        /// Jobs left unplaced.
        remaining: usize,
    },
    /// The caller's starting prefix was infeasible; nothing was built.
    InfeasiblePrefix,
}

/// Result of a constructive run.
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// The constructed ordering (possibly shorter than `n`).
    pub ordering: Vec<usize>,
    /// Evaluator verdict on `ordering`.
    pub verdict: Verdict,
    /// How construction ended.
    pub status: BuildStatus,
}

impl BuildResult {
    /// Returns `true` if every job was placed.
    pub fn is_complete(&self) -> bool {
        self.status == BuildStatus::Complete
    }

    /// Makespan of a complete, feasible ordering.
    pub fn makespan(&self) -> Option<f64> {
        if self.is_complete() {
            self.verdict.makespan()
        } else {
            None
        }
    }
}

/// Copies `prefix` and appends `job`.
pub(crate) fn extended(prefix: &[usize], job: usize) -> Vec<usize> {
    let mut next = Vec::with_capacity(prefix.len() + 1);
    next.extend_from_slice(prefix);
    next.push(job);
    next
}

/// Drives a scoring strategy until the ordering is complete or blocked.
///
/// `select` receives the evaluator, the current ordering and the ranked
/// candidates, and returns the accepted one-job extension with its verdict.
pub(crate) fn construct<S, F>(
    instance: &Instance,
    strategy: &S,
    initial_prefix: &[usize],
    mut select: F,
) -> BuildResult
where
    S: ScoringStrategy + ?Sized,
    F: FnMut(&Evaluator<'_>, &[usize], Vec<(usize, f64)>) -> Option<(Vec<usize>, Verdict)>,
{
    let evaluator = Evaluator::new(instance);
    let n = instance.n();
    let mut ordering = initial_prefix.to_vec();
    let mut verdict = evaluator.evaluate(&ordering);

    if !verdict.is_feasible() {
        debug!(
            "{}: rejecting infeasible prefix of {} jobs",
            strategy.name(),
            ordering.len()
        );
        let mut violations = verdict.violations().to_vec();
        violations.push(Violation::new(ViolationType::InfeasiblePrefix {
            len: ordering.len(),
        }));
        return BuildResult {
            ordering,
            verdict: Verdict::rejected(violations),
            status: BuildStatus::InfeasiblePrefix,
        };
    }

    let mut table = strategy.initialize(instance);
    for placed in 1..=ordering.len() {
        strategy.update(instance, &ordering[..placed], &mut table);
    }

    let mut status = BuildStatus::Complete;
    while ordering.len() < n {
        let ranked = strategy.rank(instance, &ordering, &table);
        match select(&evaluator, &ordering, ranked) {
            Some((next, next_verdict)) => {
                ordering = next;
                verdict = next_verdict;
                strategy.update(instance, &ordering, &mut table);
            }
            None => {
                trace!(
                    "{}: no feasible extension after {} of {} jobs",
                    strategy.name(),
                    ordering.len(),
                    n
                );
                status = BuildStatus::Blocked {
                    placed: ordering.len(),
                    remaining: n - ordering.len(),
                };
                break;
            }
        }
    }

    debug!(
        "{}: built {} of {} jobs, makespan {:?}",
        strategy.name(),
        ordering.len(),
        n,
        verdict.makespan()
    );

    BuildResult {
        ordering,
        verdict,
        status,
    }
}
