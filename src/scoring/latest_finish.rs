//! Latest-finish ranking.

use super::{propagate, ScoreTable, ScoringStrategy, TimePoint};
use crate::models::Instance;

/// Ranks jobs by a pessimistic finish time.
///
/// Each job starts from `p[j] + max_i s[i][j]`, its finish under the worst
/// incoming setup, and is then propagated like [`EarliestFinish`](super::EarliestFinish).
/// Because the seed already overestimates, every later score is an upper
/// bound rather than a lower one; jobs with expensive incoming setups sink in
/// the ranking until they can follow a cheap predecessor.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatestFinish;

impl ScoringStrategy for LatestFinish {
    fn name(&self) -> &str {
        "LFT"
    }

    fn initialize(&self, instance: &Instance) -> ScoreTable {
        let setup = instance.setup_matrix();
        ScoreTable::new(
            (0..instance.n())
                .map(|j| instance.processing(j) + setup.column_max(j))
                .collect(),
        )
    }

    fn update(&self, instance: &Instance, partial: &[usize], table: &mut ScoreTable) {
        propagate(instance, partial, table, TimePoint::Finish);
    }
}
