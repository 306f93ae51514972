//! Ranking strategies for constructive heuristics.
//!
//! A strategy keeps a [`ScoreTable`] with one time estimate per job. The
//! builder seeds it once with [`ScoringStrategy::initialize`], refreshes it
//! with [`ScoringStrategy::update`] after every placement, and asks for the
//! unplaced jobs in ascending score order with [`ScoringStrategy::rank`].
//!
//! - [`EarliestStart`] — lower bound on start time
//! - [`EarliestFinish`] — lower bound on finish time
//! - [`LatestFinish`] — pessimistic finish time under worst incoming setups
//!
//! All three propagate bounds the same way the evaluator's forward pass does:
//! the bound after the last placed job plus its setup, and the bound after
//! every placed precedence predecessor plus its delay.

mod earliest_finish;
mod earliest_start;
mod latest_finish;

pub use earliest_finish::EarliestFinish;
pub use earliest_start::EarliestStart;
pub use latest_finish::LatestFinish;

use serde::{Deserialize, Serialize};

use crate::models::Instance;

/// Job priorities indexed by job; lower is better.
///
/// Entries of already placed jobs go stale and are ignored by ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTable {
    values: Vec<f64>,
}

impl ScoreTable {
    /// Creates a table from per-job values.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Score of `job`.
    pub fn get(&self, job: usize) -> f64 {
        self.values[job]
    }

    /// Overwrites the score of `job`.
    pub fn set(&mut self, job: usize, value: f64) {
        self.values[job] = value;
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All entries, indexed by job.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// A pluggable priority rule driving the constructive builders.
///
/// # Examples
///
/// ```
/// use u_sequencing::models::Instance;
/// use u_sequencing::scoring::{EarliestFinish, ScoringStrategy};
///
/// let inst = Instance::from_rows(
///     vec![2.0, 3.0, 1.0],
///     vec![vec![0.0; 3]; 3],
///     vec![vec![-1.0; 3]; 3],
/// )
/// .unwrap();
///
/// let table = EarliestFinish.initialize(&inst);
/// let ranked = EarliestFinish.rank(&inst, &[], &table);
/// assert_eq!(ranked[0], (2, 1.0));
/// ```
pub trait ScoringStrategy: Send + Sync {
    /// Short name of this strategy.
    fn name(&self) -> &str;

    /// Seeds one score per job from static instance data.
    fn initialize(&self, instance: &Instance) -> ScoreTable;

    /// Refreshes the scores of unplaced jobs after `partial`'s last job was
    /// appended. Does nothing for an empty `partial`.
    fn update(&self, instance: &Instance, partial: &[usize], table: &mut ScoreTable);

    /// Unplaced jobs sorted ascending by score, ties broken by job index.
    fn rank(&self, instance: &Instance, partial: &[usize], table: &ScoreTable) -> Vec<(usize, f64)> {
        rank_unplaced(instance.n(), partial, table)
    }
}

/// Which time point a strategy's scores stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimePoint {
    /// Scores are start times; a job's own processing is added when it
    /// becomes the source of a bound.
    Start,
    /// Scores are finish times; the target's processing is added to each bound.
    Finish,
}

/// Raises the score of every unplaced job to the bounds implied by the last
/// placed job (with setup) and by each placed predecessor (with delay).
pub(crate) fn propagate(
    instance: &Instance,
    partial: &[usize],
    table: &mut ScoreTable,
    point: TimePoint,
) {
    let Some(&last) = partial.last() else {
        return;
    };

    let mut placed = vec![false; instance.n()];
    for &job in partial {
        placed[job] = true;
    }

    // Bound contributed by a placed source job before any gap is added.
    let source_end = |table: &ScoreTable, i: usize| match point {
        TimePoint::Start => table.get(i) + instance.processing(i),
        TimePoint::Finish => table.get(i),
    };
    let target_tail = |j: usize| match point {
        TimePoint::Start => 0.0,
        TimePoint::Finish => instance.processing(j),
    };

    for j in (0..instance.n()).filter(|&j| !placed[j]) {
        let mut score = table
            .get(j)
            .max(source_end(&*table, last) + instance.setup(last, j) + target_tail(j));

        for &(i, d) in instance.predecessors(j) {
            if placed[i] {
                score = score.max(source_end(&*table, i) + d + target_tail(j));
            }
        }

        table.set(j, score);
    }
}

/// Unplaced jobs sorted by (score, job index).
pub(crate) fn rank_unplaced(n: usize, partial: &[usize], table: &ScoreTable) -> Vec<(usize, f64)> {
    let mut placed = vec![false; n];
    for &job in partial {
        if job < n {
            placed[job] = true;
        }
    }

    let mut ranked: Vec<(usize, f64)> = (0..n)
        .filter(|&j| !placed[j])
        .map(|j| (j, table.get(j)))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    ranked
}

/// The built-in strategies, selectable by value (e.g. from a config).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strategy {
    /// [`EarliestStart`].
    EarliestStart,
    /// [`EarliestFinish`].
    #[default]
    EarliestFinish,
    /// [`LatestFinish`].
    LatestFinish,
}

impl Strategy {
    /// Every built-in strategy.
    pub const ALL: [Strategy; 3] = [
        Strategy::EarliestStart,
        Strategy::EarliestFinish,
        Strategy::LatestFinish,
    ];

    fn as_dyn(&self) -> &'static dyn ScoringStrategy {
        match self {
            Strategy::EarliestStart => &EarliestStart,
            Strategy::EarliestFinish => &EarliestFinish,
            Strategy::LatestFinish => &LatestFinish,
        }
    }
}

impl ScoringStrategy for Strategy {
    fn name(&self) -> &str {
        self.as_dyn().name()
    }

    fn initialize(&self, instance: &Instance) -> ScoreTable {
        self.as_dyn().initialize(instance)
    }

    fn update(&self, instance: &Instance, partial: &[usize], table: &mut ScoreTable) {
        self.as_dyn().update(instance, partial, table)
    }

    fn rank(&self, instance: &Instance, partial: &[usize], table: &ScoreTable) -> Vec<(usize, f64)> {
        self.as_dyn().rank(instance, partial, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_ties_by_index() {
        let table = ScoreTable::new(vec![3.0, 1.0, 1.0, 0.5]);
        let ranked = rank_unplaced(4, &[3], &table);
        assert_eq!(ranked, vec![(1, 1.0), (2, 1.0), (0, 3.0)]);
    }

    #[test]
    fn test_rank_all_placed() {
        let table = ScoreTable::new(vec![0.0, 0.0]);
        assert!(rank_unplaced(2, &[1, 0], &table).is_empty());
    }

    #[test]
    fn test_propagate_empty_partial_is_noop() {
        let inst = Instance::from_rows(vec![1.0], vec![vec![0.0]], vec![vec![-1.0]]).expect("valid");
        let mut table = ScoreTable::new(vec![7.0]);
        propagate(&inst, &[], &mut table, TimePoint::Start);
        assert_eq!(table.values(), &[7.0]);
    }

    #[test]
    fn test_strategy_names() {
        let names: Vec<&str> = Strategy::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["EST", "EFT", "LFT"]);
        assert_eq!(Strategy::default(), Strategy::EarliestFinish);
    }

    #[test]
    fn test_score_table_accessors() {
        let mut table = ScoreTable::new(vec![1.0, 2.0]);
        table.set(1, 5.0);
        assert_eq!(table.get(1), 5.0);
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
    }
}
