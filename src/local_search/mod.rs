//! Local search operators for improving feasible orderings.
//!
//! Every operator starts from a complete, feasible ordering, proposes one
//! neighbor per trial, and accepts it only if it is feasible and strictly
//! shortens the makespan. An operator stops after
//! [`LocalSearchConfig::max_stagnation`] consecutive non-improving trials,
//! so it never returns a worse ordering than it was given.
//!
//! - [`exchange_improve`] — Systematic pairwise swaps
//! - [`random_exchange_improve`] — Random pairwise swaps
//! - [`insert_job_random`] / [`insert_job_best`] — Single-job reinsertion
//! - [`insert_block_random`] / [`insert_block_best`] — Block reinsertion
//! - [`improve`] — Dispatch by [`Neighborhood`]

mod block;
mod config;
mod exchange;
mod outcome;
mod reinsert;

pub use block::{insert_block_best, insert_block_random};
pub use config::LocalSearchConfig;
pub use exchange::{exchange_improve, random_exchange_improve};
pub use outcome::{LocalSearchResult, SearchError};
pub use reinsert::{insert_job_best, insert_job_random};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::Instance;

/// A local search neighborhood, selectable by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Neighborhood {
    /// [`exchange_improve`].
    Exchange,
    /// [`random_exchange_improve`].
    RandomExchange,
    /// [`insert_job_random`].
    JobRandom,
    /// [`insert_job_best`].
    JobBest,
    /// [`insert_block_random`].
    BlockRandom,
    /// [`insert_block_best`].
    BlockBest,
}

impl Neighborhood {
    /// Every neighborhood.
    pub const ALL: [Neighborhood; 6] = [
        Neighborhood::Exchange,
        Neighborhood::RandomExchange,
        Neighborhood::JobRandom,
        Neighborhood::JobBest,
        Neighborhood::BlockRandom,
        Neighborhood::BlockBest,
    ];

    /// Short name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Neighborhood::Exchange => "exchange",
            Neighborhood::RandomExchange => "random exchange",
            Neighborhood::JobRandom => "job insertion",
            Neighborhood::JobBest => "best job insertion",
            Neighborhood::BlockRandom => "block insertion",
            Neighborhood::BlockBest => "best block insertion",
        }
    }
}

/// Runs the operator for `neighborhood` on `ordering`.
///
/// [`Neighborhood::Exchange`] makes no random choice and leaves `rng`
/// untouched.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_sequencing::models::Instance;
/// use u_sequencing::local_search::{improve, LocalSearchConfig, Neighborhood};
///
/// let inst = Instance::from_rows(
///     vec![1.0, 1.0],
///     vec![vec![0.0, 5.0], vec![0.0, 0.0]],
///     vec![vec![-1.0; 2]; 2],
/// )
/// .unwrap();
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let config = LocalSearchConfig::default().with_max_stagnation(20);
/// for neighborhood in Neighborhood::ALL {
///     let result = improve(&inst, &[0, 1], neighborhood, &config, &mut rng).unwrap();
///     assert!(result.makespan <= result.initial_makespan);
/// }
/// ```
pub fn improve<R: Rng + ?Sized>(
    instance: &Instance,
    ordering: &[usize],
    neighborhood: Neighborhood,
    config: &LocalSearchConfig,
    rng: &mut R,
) -> Result<LocalSearchResult, SearchError> {
    match neighborhood {
        Neighborhood::Exchange => exchange_improve(instance, ordering, config),
        Neighborhood::RandomExchange => random_exchange_improve(instance, ordering, config, rng),
        Neighborhood::JobRandom => insert_job_random(instance, ordering, config, rng),
        Neighborhood::JobBest => insert_job_best(instance, ordering, config, rng),
        Neighborhood::BlockRandom => insert_block_random(instance, ordering, config, rng),
        Neighborhood::BlockBest => insert_block_best(instance, ordering, config, rng),
    }
}

/// Moves the block `ordering[from..from + size]` so that it starts at index
/// `to` of the result. `to` ranges over `0..=ordering.len() - size`.
pub(crate) fn relocated(ordering: &[usize], from: usize, size: usize, to: usize) -> Vec<usize> {
    let block = &ordering[from..from + size];
    let mut rest: Vec<usize> = Vec::with_capacity(ordering.len());
    rest.extend_from_slice(&ordering[..from]);
    rest.extend_from_slice(&ordering[from + size..]);
    rest.splice(to..to, block.iter().copied());
    rest
}
