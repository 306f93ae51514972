//! Earliest-start ranking.

use super::{propagate, ScoreTable, ScoringStrategy, TimePoint};
use crate::models::Instance;

/// Ranks jobs by a lower bound on their start time.
///
/// Every job is seeded at 0. After each placement a job's bound becomes the
/// largest of its previous bound, the last placed job's bound plus that job's
/// processing and the setup into it, and each placed predecessor's bound plus
/// processing and delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarliestStart;

impl ScoringStrategy for EarliestStart {
    fn name(&self) -> &str {
        "EST"
    }

    fn initialize(&self, instance: &Instance) -> ScoreTable {
        ScoreTable::new(vec![0.0; instance.n()])
    }

    fn update(&self, instance: &Instance, partial: &[usize], table: &mut ScoreTable) {
        propagate(instance, partial, table, TimePoint::Start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Instance {
        Instance::from_rows(
            vec![3.0, 2.0, 4.0],
            vec![
                vec![0.0, 1.0, 2.0],
                vec![5.0, 0.0, 1.0],
                vec![1.0, 3.0, 0.0],
            ],
            vec![
                vec![-1.0, -1.0, 6.0],
                vec![-1.0, -1.0, -1.0],
                vec![-1.0, -1.0, -1.0],
            ],
        )
        .expect("valid")
    }

    #[test]
    fn test_est_initial() {
        let inst = sample();
        let table = EarliestStart.initialize(&inst);
        assert_eq!(table.values(), &[0.0, 0.0, 0.0]);
        let ranked = EarliestStart.rank(&inst, &[], &table);
        assert_eq!(ranked, vec![(0, 0.0), (1, 0.0), (2, 0.0)]);
    }

    #[test]
    fn test_est_update_matches_forward_pass() {
        let inst = sample();
        let mut table = EarliestStart.initialize(&inst);

        EarliestStart.update(&inst, &[0], &mut table);
        // 1: 0 + 3 + 1 = 4; 2: max(0 + 3 + 2, 0 + 3 + 6) = 9
        assert_eq!(EarliestStart.rank(&inst, &[0], &table), vec![(1, 4.0), (2, 9.0)]);

        EarliestStart.update(&inst, &[0, 1], &mut table);
        // 2: max(9, 4 + 2 + 1, 0 + 3 + 6) = 9, the start the evaluator computes
        assert_eq!(table.get(2), 9.0);
        let v = crate::evaluation::evaluate(&inst, &[0, 1, 2]);
        assert_eq!(v.schedule().and_then(|s| s.start(2)), Some(9.0));
    }

    #[test]
    fn test_est_placed_entries_untouched() {
        let inst = sample();
        let mut table = EarliestStart.initialize(&inst);
        EarliestStart.update(&inst, &[1], &mut table);
        assert_eq!(table.get(1), 0.0);
    }
}
