//! Block reinsertion operators.
//!
//! # Algorithm
//!
//! Each trial cuts a contiguous block of random size in
//! `[2, max(2, floor(block_fraction * n))]` at a random position and
//! reinserts it, internal order preserved, elsewhere in the remaining
//! ordering. A block that would cover the whole ordering cannot move and the
//! trial counts as non-improving.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use rand::Rng;

use super::outcome::{Incumbent, LocalSearchResult, SearchError};
use super::{relocated, LocalSearchConfig};
use crate::evaluation::best_accepted;
use crate::models::Instance;

/// A block cut: `(start, size)`, or `None` if the block cannot move.
fn draw_block<R: Rng + ?Sized>(len: usize, max_block: usize, rng: &mut R) -> Option<(usize, usize)> {
    let size = rng.random_range(2..=max_block);
    if size >= len {
        return None;
    }
    Some((rng.random_range(0..=len - size), size))
}

/// Improves `ordering` by moving one random block to one random position
/// per trial.
pub fn insert_block_random<R: Rng + ?Sized>(
    instance: &Instance,
    ordering: &[usize],
    config: &LocalSearchConfig,
    rng: &mut R,
) -> Result<LocalSearchResult, SearchError> {
    let incumbent = Incumbent::start(instance, ordering, config)?;
    let len = ordering.len();
    let max_block = config.max_block(len);
    Ok(incumbent.search("block insertion", config.max_stagnation, |inc| {
        let (from, size) = draw_block(len, max_block, rng)?;
        let mut to = rng.random_range(0..len - size);
        if to >= from {
            to += 1;
        }
        Some(inc.propose(relocated(inc.ordering(), from, size, to)))
    }))
}

/// Improves `ordering` by moving one random block to its best position per
/// trial.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_sequencing::models::Instance;
/// use u_sequencing::local_search::{insert_block_best, LocalSearchConfig};
///
/// let inst = Instance::from_rows(
///     vec![1.0, 1.0, 1.0],
///     vec![vec![0.0; 3]; 3],
///     vec![vec![-1.0; 3]; 3],
/// )
/// .unwrap();
///
/// // Nothing to gain without setups: the budget runs out untouched.
/// let mut rng = StdRng::seed_from_u64(0);
/// let config = LocalSearchConfig::default().with_max_stagnation(10);
/// let result = insert_block_best(&inst, &[0, 1, 2], &config, &mut rng).unwrap();
/// assert!(!result.improved);
/// assert_eq!(result.trials, 10);
/// ```
pub fn insert_block_best<R: Rng + ?Sized>(
    instance: &Instance,
    ordering: &[usize],
    config: &LocalSearchConfig,
    rng: &mut R,
) -> Result<LocalSearchResult, SearchError> {
    let incumbent = Incumbent::start(instance, ordering, config)?;
    let len = ordering.len();
    let max_block = config.max_block(len);
    Ok(incumbent.search("best block insertion", config.max_stagnation, |inc| {
        let (from, size) = draw_block(len, max_block, rng)?;
        let candidates = (0..=len - size)
            .filter(|&to| to != from)
            .map(|to| relocated(inc.ordering(), from, size, to));
        best_accepted(inc.evaluator(), candidates, |v| inc.is_improved_by(v))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::evaluate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Pairs (0, 1) and (2, 3) chain for free; 3 -> 0 is free too, every
    /// other switch costs 6. Best order is [2, 3, 0, 1].
    fn paired() -> Instance {
        let mut s = vec![vec![6.0; 4]; 4];
        for (i, row) in s.iter_mut().enumerate() {
            row[i] = 0.0;
        }
        s[0][1] = 0.0;
        s[2][3] = 0.0;
        s[3][0] = 0.0;
        Instance::from_rows(vec![1.0; 4], s, vec![vec![-1.0; 4]; 4]).expect("valid")
    }

    #[test]
    fn test_draw_block_bounds() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..200 {
            if let Some((from, size)) = draw_block(10, 4, &mut rng) {
                assert!((2..=4).contains(&size));
                assert!(from + size <= 10);
            }
        }
        // A block as long as the ordering never fits.
        assert_eq!(draw_block(2, 2, &mut rng), None);
    }

    #[test]
    fn test_best_block_moves_pair() {
        let inst = paired();
        let start = [0, 1, 2, 3];
        assert_eq!(evaluate(&inst, &start).makespan(), Some(10.0));
        assert_eq!(evaluate(&inst, &[2, 3, 0, 1]).makespan(), Some(4.0));

        // fraction 0.5 of 4 jobs: blocks of exactly 2.
        let config = LocalSearchConfig::default()
            .with_max_stagnation(100)
            .with_block_fraction(0.5);
        let mut rng = StdRng::seed_from_u64(12);
        let result = insert_block_best(&inst, &start, &config, &mut rng).expect("ok");
        assert!(result.improved);
        assert_eq!(result.makespan, 4.0);
        assert_eq!(result.ordering, vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_random_block_improves() {
        let inst = paired();
        let config = LocalSearchConfig::default()
            .with_max_stagnation(200)
            .with_block_fraction(0.5);
        let mut rng = StdRng::seed_from_u64(2);
        let result = insert_block_random(&inst, &[0, 1, 2, 3], &config, &mut rng).expect("ok");
        assert_eq!(result.makespan, 4.0);
        assert!(result.verdict.is_feasible());
    }

    #[test]
    fn test_two_jobs_never_move() {
        let inst = Instance::from_rows(
            vec![1.0, 1.0],
            vec![vec![0.0, 3.0], vec![0.0, 0.0]],
            vec![vec![-1.0; 2]; 2],
        )
        .expect("valid");
        let config = LocalSearchConfig::default().with_max_stagnation(15);
        let mut rng = StdRng::seed_from_u64(0);
        let result = insert_block_random(&inst, &[0, 1], &config, &mut rng).expect("ok");
        assert!(!result.improved);
        assert_eq!(result.trials, 15);
    }
}
