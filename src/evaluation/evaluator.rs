//! Ordering evaluator that computes timing and feasibility.

use crate::models::{Instance, Schedule, ScheduledJob, Verdict, Violation, ViolationType};

/// Slack absorbed by the timing verification pass and by strict-improvement
/// comparisons in local search.
pub const TOLERANCE: f64 = 1e-9;

/// Evaluates orderings (complete or partial) against one instance, computing
/// start/finish times and checking precedence and setup constraints.
///
/// Malformed input is reported through the returned [`Verdict`], never as a
/// panic, so search code can try candidate moves freely.
///
/// # Examples
///
/// ```
/// use u_sequencing::models::Instance;
/// use u_sequencing::evaluation::Evaluator;
///
/// let inst = Instance::from_rows(
///     vec![2.0, 3.0, 1.0],
///     vec![vec![0.0; 3]; 3],
///     vec![vec![-1.0; 3]; 3],
/// )
/// .unwrap();
///
/// let eval = Evaluator::new(&inst);
/// let verdict = eval.evaluate(&[2, 0, 1]);
/// assert!(verdict.is_feasible());
/// assert_eq!(verdict.makespan(), Some(6.0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    instance: &'a Instance,
}

impl<'a> Evaluator<'a> {
    /// Creates a new evaluator for the given instance.
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// The instance this evaluator reads.
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Evaluates an ordering.
    ///
    /// Steps: structural check (duplicates, range), predecessor completeness
    /// and order, forward timing pass, then a redundant verification of every
    /// setup and delay bound within [`TOLERANCE`].
    pub fn evaluate(&self, ordering: &[usize]) -> Verdict {
        let n = self.instance.n();

        let mut position = vec![None; n];
        let mut malformed = Vec::new();
        for (r, &job) in ordering.iter().enumerate() {
            if job >= n {
                malformed.push(Violation::new(ViolationType::JobOutOfRange {
                    job,
                    position: r,
                    n,
                }));
                continue;
            }
            match position[job] {
                Some(first) => malformed.push(Violation::new(ViolationType::DuplicateJob {
                    job,
                    first,
                    position: r,
                })),
                None => position[job] = Some(r),
            }
        }
        if !malformed.is_empty() {
            return Verdict::rejected(malformed);
        }

        let order_violations = self.check_precedence(ordering, &position);
        if !order_violations.is_empty() {
            return Verdict::rejected(order_violations);
        }

        let schedule = self.forward_pass(ordering);
        let violations = self.verify(&schedule);
        Verdict::scheduled(schedule, violations)
    }

    /// Makespan of a feasible ordering, `None` otherwise.
    pub fn makespan(&self, ordering: &[usize]) -> Option<f64> {
        self.evaluate(ordering).makespan()
    }

    /// Every predecessor of a placed job must be placed, and placed earlier.
    /// A job listed as its own predecessor can never satisfy this.
    fn check_precedence(&self, ordering: &[usize], position: &[Option<usize>]) -> Vec<Violation> {
        let mut violations = Vec::new();
        for (r, &job) in ordering.iter().enumerate() {
            for &(predecessor, _) in self.instance.predecessors(job) {
                match position[predecessor] {
                    None => violations.push(Violation::new(ViolationType::MissingPredecessor {
                        predecessor,
                        job,
                    })),
                    Some(p) if p >= r => {
                        violations.push(Violation::new(ViolationType::PrecedenceOrder {
                            predecessor,
                            job,
                        }))
                    }
                    Some(_) => {}
                }
            }
        }
        violations
    }

    /// Computes start/finish times. Assumes every predecessor is placed earlier.
    fn forward_pass(&self, ordering: &[usize]) -> Schedule {
        let inst = self.instance;
        let mut schedule = Schedule::with_capacity(inst.n(), ordering.len());
        let mut finish = vec![0.0; inst.n()];
        let mut prev: Option<usize> = None;

        for &job in ordering {
            let (setup, setup_bound) = match prev {
                Some(i) => {
                    let s = inst.setup(i, job);
                    (s, finish[i] + s)
                }
                None => (0.0, 0.0),
            };

            let precedence_bound = inst
                .predecessors(job)
                .iter()
                .map(|&(i, d)| finish[i] + d)
                .fold(0.0, f64::max);

            let start = setup_bound.max(precedence_bound);
            finish[job] = start + inst.processing(job);

            schedule.push(ScheduledJob {
                job,
                start,
                finish: finish[job],
                setup,
            });
            prev = Some(job);
        }

        schedule
    }

    /// Re-checks the setup and delay bounds on a computed schedule.
    ///
    /// Never fires for a schedule produced by [`Self::forward_pass`].
    fn verify(&self, schedule: &Schedule) -> Vec<Violation> {
        let inst = self.instance;
        let mut violations = Vec::new();

        for pair in schedule.entries().windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let required = prev.finish + inst.setup(prev.job, next.job);
            if next.start + TOLERANCE < required {
                violations.push(Violation::new(ViolationType::SetupGap {
                    from: prev.job,
                    to: next.job,
                    start: next.start,
                    required,
                }));
            }
        }

        for entry in schedule.entries() {
            for &(predecessor, d) in inst.predecessors(entry.job) {
                let Some(pred_finish) = schedule.finish(predecessor) else {
                    continue;
                };
                let required = pred_finish + d;
                if entry.start + TOLERANCE < required {
                    violations.push(Violation::new(ViolationType::DelayGap {
                        predecessor,
                        job: entry.job,
                        start: entry.start,
                        required,
                    }));
                }
            }
        }

        violations
    }
}

/// Evaluates `ordering` against `instance`.
///
/// Shorthand for `Evaluator::new(instance).evaluate(ordering)`.
pub fn evaluate(instance: &Instance, ordering: &[usize]) -> Verdict {
    Evaluator::new(instance).evaluate(ordering)
}
