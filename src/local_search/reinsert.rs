//! Single-job reinsertion operators.
//!
//! # Algorithm
//!
//! Each trial removes one randomly chosen job. The random variant puts it
//! back at one random position; the best variant evaluates every other
//! position and proposes the best feasible, strictly improving one.
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

/// Improves `ordering` by moving one random job to one random position per
/// trial.
pub fn insert_job_random<R: Rng + ?Sized>(
    instance: &Instance,
    ordering: &[usize],
    config: &LocalSearchConfig,
    rng: &mut R,
) -> Result<LocalSearchResult, SearchError> {
    let incumbent = Incumbent::start(instance, ordering, config)?;
    let len = ordering.len();
    Ok(incumbent.search("job insertion", config.max_stagnation, |inc| {
        let from = rng.random_range(0..len);
        let mut to = rng.random_range(0..len - 1);
        if to >= from {
            to += 1;
        }
        Some(inc.propose(relocated(inc.ordering(), from, 1, to)))
    }))
}

/// Improves `ordering` by moving one random job to its best position per
/// trial.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_sequencing::models::Instance;
/// use u_sequencing::local_search::{insert_job_best, LocalSearchConfig};
///
/// // Job 2 belongs first: it sets up cheaply into 0, everything else is slow.
/// let inst = Instance::from_rows(
///     vec![1.0, 1.0, 1.0],
///     vec![
///         vec![0.0, 0.0, 3.0],
///         vec![3.0, 0.0, 3.0],
///         vec![0.0, 3.0, 0.0],
///     ],
///     vec![vec![-1.0; 3]; 3],
/// )
/// .unwrap();
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let config = LocalSearchConfig::default().with_max_stagnation(50);
/// let result = insert_job_best(&inst, &[0, 1, 2], &config, &mut rng).unwrap();
/// assert_eq!(result.ordering, vec![2, 0, 1]);
/// assert_eq!(result.makespan, 3.0);
/// ```
pub fn insert_job_best<R: Rng + ?Sized>(
    instance: &Instance,
    ordering: &[usize],
    config: &LocalSearchConfig,
    rng: &mut R,
) -> Result<LocalSearchResult, SearchError> {
    let incumbent = Incumbent::start(instance, ordering, config)?;
    let len = ordering.len();
    Ok(incumbent.search("best job insertion", config.max_stagnation, |inc| {
        let from = rng.random_range(0..len);
        let candidates = (0..len)
            .filter(|&to| to != from)
            .map(|to| relocated(inc.ordering(), from, 1, to));
        best_accepted(inc.evaluator(), candidates, |v| inc.is_improved_by(v))
    }))
}
