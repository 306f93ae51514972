//! Feasibility verdicts and violation records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Schedule;

/// A type of constraint violation found in an ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A job index appears more than once.
    DuplicateJob {
        /// Repeated job.
        job: usize,
        /// Position of the first occurrence.
        first: usize,
        /// Position of the repeat.
        position: usize,
    },
    /// A job index is not below the number of jobs.
    JobOutOfRange {
        /// Offending index.
        job: usize,
        /// Position in the ordering.
        position: usize,
        /// Number of jobs in the instance.
        n: usize,
    },
    /// A required predecessor is absent from the ordering.
    MissingPredecessor {
        /// Absent predecessor.
        predecessor: usize,
        /// Job that requires it.
        job: usize,
    },
    /// A required predecessor appears after its successor.
    PrecedenceOrder {
        /// Predecessor placed too late.
        predecessor: usize,
        /// Job that requires it.
        job: usize,
    },
    /// Start time leaves too little room for the setup after the previous job.
    SetupGap {
        /// Immediately preceding job.
        from: usize,
        /// Job that starts too early.
        to: usize,
        /// Computed start.
        start: f64,
        /// Earliest allowed start.
        required: f64,
    },
    /// Start time leaves too little room for a precedence delay.
    DelayGap {
        /// Predecessor.
        predecessor: usize,
        /// Job that starts too early.
        job: usize,
        /// Computed start.
        start: f64,
        /// Earliest allowed start.
        required: f64,
    },
    /// A builder was handed a starting prefix that is not itself feasible.
    InfeasiblePrefix {
        /// Length of the rejected prefix.
        len: usize,
    },
}

/// A constraint violation in an ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }

    /// Returns `true` for duplicate or out-of-range job indices.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self.kind,
            ViolationType::DuplicateJob { .. } | ViolationType::JobOutOfRange { .. }
        )
    }

    /// Returns `true` for violations raised by the timing verification pass.
    pub fn is_timing(&self) -> bool {
        matches!(
            self.kind,
            ViolationType::SetupGap { .. } | ViolationType::DelayGap { .. }
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationType::DuplicateJob {
                job,
                first,
                position,
            } => write!(f, "job {job} appears at positions {first} and {position}"),
            ViolationType::JobOutOfRange { job, position, n } => {
                write!(f, "job {job} at position {position} is outside 0..{n}")
            }
            ViolationType::MissingPredecessor { predecessor, job } => {
                write!(f, "job {job} requires predecessor {predecessor}, which is missing")
            }
            ViolationType::PrecedenceOrder { predecessor, job } => {
                write!(f, "predecessor {predecessor} is placed after job {job}")
            }
            ViolationType::SetupGap {
                from,
                to,
                start,
                required,
            } => write!(
                f,
                "setup {from}->{to} violated: start {start} < finish + setup {required}"
            ),
            ViolationType::DelayGap {
                predecessor,
                job,
                start,
                required,
            } => write!(
                f,
                "delay {predecessor}->{job} violated: start {start} < finish + delay {required}"
            ),
            ViolationType::InfeasiblePrefix { len } => {
                write!(f, "initial prefix of {len} jobs is infeasible")
            }
        }
    }
}

/// Outcome of evaluating one ordering.
///
/// Feasible verdicts always carry a schedule and a makespan. Infeasible
/// verdicts carry at least one violation, and a schedule only when the
/// ordering was structurally sound but failed timing verification.
///
/// # Examples
///
/// ```
/// use u_sequencing::models::Instance;
/// use u_sequencing::evaluation::evaluate;
///
/// let inst = Instance::from_rows(
///     vec![1.0, 1.0],
///     vec![vec![0.0; 2]; 2],
///     vec![vec![-1.0, 5.0], vec![-1.0, -1.0]],
/// )
/// .unwrap();
///
/// let ok = evaluate(&inst, &[0, 1]);
/// assert!(ok.is_feasible());
/// assert_eq!(ok.makespan(), Some(7.0));
///
/// let bad = evaluate(&inst, &[1, 0]);
/// assert!(!bad.is_feasible());
/// assert!(bad.schedule().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    feasible: bool,
    violations: Vec<Violation>,
    schedule: Option<Schedule>,
    makespan: Option<f64>,
}

impl Verdict {
    /// A verdict for an ordering that could not be scheduled at all.
    pub(crate) fn rejected(violations: Vec<Violation>) -> Self {
        Self {
            feasible: false,
            violations,
            schedule: None,
            makespan: None,
        }
    }

    /// A verdict for a computed schedule; feasible iff `violations` is empty.
    pub(crate) fn scheduled(schedule: Schedule, violations: Vec<Violation>) -> Self {
        let feasible = violations.is_empty();
        let makespan = feasible.then(|| schedule.last_finish());
        Self {
            feasible,
            violations,
            schedule: Some(schedule),
            makespan,
        }
    }

    /// Whether the ordering satisfies every constraint.
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Violations found, empty when feasible.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// The computed schedule, if timing was reached.
    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    /// Finish time of the last job of the ordering, when feasible.
    pub fn makespan(&self) -> Option<f64> {
        self.makespan
    }

    /// Human-readable violation messages.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduledJob;

    #[test]
    fn test_rejected_verdict() {
        let v = Verdict::rejected(vec![Violation::new(ViolationType::MissingPredecessor {
            predecessor: 0,
            job: 1,
        })]);
        assert!(!v.is_feasible());
        assert!(v.schedule().is_none());
        assert!(v.makespan().is_none());
        assert_eq!(
            v.messages(),
            vec!["job 1 requires predecessor 0, which is missing".to_string()]
        );
    }

    #[test]
    fn test_scheduled_verdict() {
        let mut s = Schedule::with_capacity(1, 1);
        s.push(ScheduledJob {
            job: 0,
            start: 0.0,
            finish: 4.0,
            setup: 0.0,
        });
        let v = Verdict::scheduled(s.clone(), vec![]);
        assert!(v.is_feasible());
        assert_eq!(v.makespan(), Some(4.0));

        let gap = Violation::new(ViolationType::SetupGap {
            from: 1,
            to: 0,
            start: 0.0,
            required: 2.0,
        });
        let v = Verdict::scheduled(s, vec![gap]);
        assert!(!v.is_feasible());
        assert!(v.schedule().is_some());
        assert!(v.makespan().is_none());
        assert!(v.violations()[0].is_timing());
    }

    #[test]
    fn test_violation_kinds() {
        let dup = Violation::new(ViolationType::DuplicateJob {
            job: 2,
            first: 0,
            position: 3,
        });
        assert!(dup.is_malformed());
        assert!(!dup.is_timing());
        assert_eq!(dup.to_string(), "job 2 appears at positions 0 and 3");
    }
}
