//! Search results, start-up errors and the shared stagnation loop.

use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::LocalSearchConfig;
use crate::evaluation::{Evaluator, TOLERANCE};
use crate::models::{Instance, Verdict, Violation};

/// Why a local search run could not start.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The configuration failed validation.
    InvalidConfig(String),
    /// The starting ordering does not contain every job.
    IncompleteStart {
        /// Length of the given ordering.
        len: usize,
        /// Number of jobs in the instance.
        n: usize,
    },
    /// The starting ordering is not feasible.
    InfeasibleStart {
        /// Violations reported for the starting ordering.
        violations: Vec<Violation>,
    },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            SearchError::IncompleteStart { len, n } => {
                write!(f, "starting ordering has {len} of {n} jobs")
            }
            SearchError::InfeasibleStart { violations } => {
                write!(f, "starting ordering is infeasible")?;
                if let Some(first) = violations.first() {
                    write!(f, ": {first}")?;
                }
                if violations.len() > 1 {
                    write!(f, " (+{} more)", violations.len() - 1)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for SearchError {}

/// Result of a local search run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalSearchResult {
    /// Best ordering found (the input if nothing improved).
    pub ordering: Vec<usize>,

    /// Verdict for `ordering`.
    pub verdict: Verdict,

    /// Makespan of `ordering`.
    pub makespan: f64,

    /// Makespan of the starting ordering.
    pub initial_makespan: f64,

    /// Whether any move was accepted.
    pub improved: bool,

    /// Total number of trials (proposed neighbors).
    pub trials: usize,

    /// Number of accepted moves.
    pub improvements: usize,
}

/// The current ordering of a running search with its bookkeeping.
pub(crate) struct Incumbent<'a> {
    evaluator: Evaluator<'a>,
    ordering: Vec<usize>,
    verdict: Verdict,
    makespan: f64,
    initial_makespan: f64,
    trials: usize,
    improvements: usize,
}

impl<'a> Incumbent<'a> {
    /// Checks the configuration and the starting ordering.
    pub(crate) fn start(
        instance: &'a Instance,
        ordering: &[usize],
        config: &LocalSearchConfig,
    ) -> Result<Self, SearchError> {
        config.validate().map_err(SearchError::InvalidConfig)?;
        if ordering.len() != instance.n() {
            return Err(SearchError::IncompleteStart {
                len: ordering.len(),
                n: instance.n(),
            });
        }

        let evaluator = Evaluator::new(instance);
        let verdict = evaluator.evaluate(ordering);
        let Some(makespan) = verdict.makespan().filter(|_| verdict.is_feasible()) else {
            return Err(SearchError::InfeasibleStart {
                violations: verdict.violations().to_vec(),
            });
        };

        Ok(Self {
            evaluator,
            ordering: ordering.to_vec(),
            verdict,
            makespan,
            initial_makespan: makespan,
            trials: 0,
            improvements: 0,
        })
    }

    pub(crate) fn evaluator(&self) -> &Evaluator<'a> {
        &self.evaluator
    }

    pub(crate) fn ordering(&self) -> &[usize] {
        &self.ordering
    }

    pub(crate) fn improvements(&self) -> usize {
        self.improvements
    }

    /// Evaluates one proposed neighbor.
    pub(crate) fn propose(&self, candidate: Vec<usize>) -> (Vec<usize>, Verdict) {
        let verdict = self.evaluator.evaluate(&candidate);
        (candidate, verdict)
    }

    /// Feasible and strictly better than the incumbent.
    pub(crate) fn is_improved_by(&self, verdict: &Verdict) -> bool {
        verdict.is_feasible()
            && verdict
                .makespan()
                .is_some_and(|m| m < self.makespan - TOLERANCE)
    }

    /// Runs trials until `limit` consecutive ones fail to improve.
    ///
    /// `trial` proposes one neighbor of the incumbent (or `None` when it
    /// could not form a move); an improving proposal replaces the incumbent.
    pub(crate) fn search<F>(mut self, name: &str, limit: usize, mut trial: F) -> LocalSearchResult
    where
        F: FnMut(&Self) -> Option<(Vec<usize>, Verdict)>,
    {
        debug!(
            "{name}: start makespan {:.3}, stagnation limit {limit}",
            self.makespan
        );

        let mut stagnation = 0;
        if self.ordering.len() < 2 {
            stagnation = limit;
        }

        while stagnation < limit {
            self.trials += 1;
            match trial(&self) {
                Some((ordering, verdict)) if self.is_improved_by(&verdict) => {
                    if let Some(makespan) = verdict.makespan() {
                        trace!(
                            "{name}: trial {} improves {:.3} -> {:.3}",
                            self.trials,
                            self.makespan,
                            makespan
                        );
                        self.makespan = makespan;
                    }
                    self.ordering = ordering;
                    self.verdict = verdict;
                    self.improvements += 1;
                    stagnation = 0;
                }
                _ => stagnation += 1,
            }
        }

        debug!(
            "{name}: makespan {:.3} -> {:.3} after {} trials, {} improvements",
            self.initial_makespan, self.makespan, self.trials, self.improvements
        );

        LocalSearchResult {
            improved: self.improvements > 0,
            ordering: self.ordering,
            verdict: self.verdict,
            makespan: self.makespan,
            initial_makespan: self.initial_makespan,
            trials: self.trials,
            improvements: self.improvements,
        }
    }
}
