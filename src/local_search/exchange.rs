//! Pairwise exchange operators.
//!
//! # Algorithm
//!
//! Swaps the jobs at two positions. The exhaustive variant sweeps every pair
//! `i < j` in order and restarts the sweep after each accepted swap; the
//! random variant draws one pair per trial.
//!
//! # Complexity
//!
//! Each trial is one evaluation, O(n + arcs). A full sweep is n(n-1)/2 trials.

use rand::Rng;

use super::outcome::{Incumbent, LocalSearchResult, SearchError};
use super::LocalSearchConfig;
use crate::models::Instance;

fn swapped(ordering: &[usize], i: usize, j: usize) -> Vec<usize> {
    let mut next = ordering.to_vec();
    next.swap(i, j);
    next
}

/// Improves `ordering` by systematic pairwise swaps.
///
/// Stops after `max_stagnation` consecutive non-improving swaps, or after a
/// full sweep without improvement, whichever comes first.
///
/// # Examples
///
/// ```
/// use u_sequencing::models::Instance;
/// use u_sequencing::local_search::{exchange_improve, LocalSearchConfig};
///
/// // Setup 0->1 is expensive, 1->0 is free.
/// let inst = Instance::from_rows(
///     vec![1.0, 1.0],
///     vec![vec![0.0, 5.0], vec![0.0, 0.0]],
///     vec![vec![-1.0; 2]; 2],
/// )
/// .unwrap();
///
/// let result = exchange_improve(&inst, &[0, 1], &LocalSearchConfig::default()).unwrap();
/// assert_eq!(result.ordering, vec![1, 0]);
/// assert_eq!(result.makespan, 2.0);
/// assert!(result.improved);
/// ```
pub fn exchange_improve(
    instance: &Instance,
    ordering: &[usize],
    config: &LocalSearchConfig,
) -> Result<LocalSearchResult, SearchError> {
    let incumbent = Incumbent::start(instance, ordering, config)?;
    let len = ordering.len();
    let pairs: Vec<(usize, usize)> = (0..len)
        .flat_map(|i| (i + 1..len).map(move |j| (i, j)))
        .collect();
    let limit = config.max_stagnation.min(pairs.len());

    let mut cursor = 0;
    let mut seen = 0;
    Ok(incumbent.search("exchange", limit, |inc| {
        if inc.improvements() != seen {
            seen = inc.improvements();
            cursor = 0;
        }
        let &(i, j) = pairs.get(cursor)?;
        cursor += 1;
        Some(inc.propose(swapped(inc.ordering(), i, j)))
    }))
}

/// Improves `ordering` by swapping two randomly chosen positions per trial.
pub fn random_exchange_improve<R: Rng + ?Sized>(
    instance: &Instance,
    ordering: &[usize],
    config: &LocalSearchConfig,
    rng: &mut R,
) -> Result<LocalSearchResult, SearchError> {
    let incumbent = Incumbent::start(instance, ordering, config)?;
    let len = ordering.len();
    Ok(incumbent.search("random exchange", config.max_stagnation, |inc| {
        let i = rng.random_range(0..len);
        let mut j = rng.random_range(0..len - 1);
        if j >= i {
            j += 1;
        }
        Some(inc.propose(swapped(inc.ordering(), i, j)))
    }))
}
