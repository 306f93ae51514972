//! Earliest-finish ranking.

use super::{propagate, ScoreTable, ScoringStrategy, TimePoint};
use crate::models::Instance;

/// Ranks jobs by a lower bound on their finish time.
///
/// Seeds each job with its own processing time, so on an instance without
/// setups or precedence the ranking is shortest-processing-time first.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarliestFinish;

impl ScoringStrategy for EarliestFinish {
    fn name(&self) -> &str {
        "EFT"
    }

    fn initialize(&self, instance: &Instance) -> ScoreTable {
        ScoreTable::new(instance.processing_times().to_vec())
    }

    fn update(&self, instance: &Instance, partial: &[usize], table: &mut ScoreTable) {
        propagate(instance, partial, table, TimePoint::Finish);
    }
}
