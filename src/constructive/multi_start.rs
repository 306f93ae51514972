//! Multi-start GRASP orchestration.
//!
//! # Algorithm
//!
//! Runs [`grasp_build`] `runs` times, each restart with its own
//! [`StdRng`] seeded `seed + k`, optionally polishes every complete
//! ordering with a chain of local search neighborhoods, and keeps the
//! feasible result with the smallest makespan. Restarts share nothing but
//! the read-only instance; with the `parallel` feature they run on rayon's
//! thread pool and produce the same result as the sequential loop.

use std::time::{Duration, Instant};

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{grasp_build, BuildResult, RclPolicy};
use crate::local_search::{improve, LocalSearchConfig, Neighborhood, SearchError};
use crate::models::{Instance, Verdict};
use crate::scoring::{ScoringStrategy, Strategy};

/// Configuration for [`multi_start`].
///
/// # Examples
///
/// ```
/// use u_sequencing::constructive::{MultiStartConfig, RclPolicy};
/// use u_sequencing::local_search::Neighborhood;
/// use u_sequencing::scoring::Strategy;
///
/// let config = MultiStartConfig::default()
///     .with_runs(25)
///     .with_rcl(RclPolicy::Size(3))
///     .with_strategy(Strategy::LatestFinish)
///     .with_neighborhoods(vec![Neighborhood::JobBest, Neighborhood::Exchange])
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiStartConfig {
    /// Number of independent restarts.
    pub runs: usize,

    /// Restricted candidate list policy for each construction.
    pub rcl: RclPolicy,

    /// Scoring strategy driving construction.
    pub strategy: Strategy,

    /// Local search applied in order to each complete ordering. Empty means
    /// construction only.
    pub neighborhoods: Vec<Neighborhood>,

    /// Parameters for every local search step.
    pub local_search: LocalSearchConfig,

    /// Base seed; restart `k` uses `seed + k`. Drawn at random when absent.
    pub seed: Option<u64>,
}

impl Default for MultiStartConfig {
    fn default() -> Self {
        Self {
            runs: 10,
            rcl: RclPolicy::default(),
            strategy: Strategy::default(),
            neighborhoods: Vec::new(),
            local_search: LocalSearchConfig::default(),
            seed: None,
        }
    }
}

impl MultiStartConfig {
    pub fn with_runs(mut self, n: usize) -> Self {
        self.runs = n;
        self
    }

    pub fn with_rcl(mut self, rcl: RclPolicy) -> Self {
        self.rcl = rcl;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_neighborhoods(mut self, neighborhoods: Vec<Neighborhood>) -> Self {
        self.neighborhoods = neighborhoods;
        self
    }

    pub fn with_local_search(mut self, config: LocalSearchConfig) -> Self {
        self.local_search = config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.runs == 0 {
            return Err("runs must be at least 1".into());
        }
        self.rcl.validate()?;
        if !self.neighborhoods.is_empty() {
            self.local_search.validate()?;
        }
        Ok(())
    }
}

/// Outcome of one restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Restart index.
    pub run: usize,

    /// Seed of this restart's random stream.
    pub seed: u64,

    /// Makespan right after construction, if complete.
    pub constructed: Option<f64>,

    /// Makespan after local search, if complete.
    pub makespan: Option<f64>,

    /// Whether construction placed every job.
    pub complete: bool,
}

/// Result of a multi-start run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiStartResult {
    /// Best complete ordering found; empty if no restart completed.
    pub best_ordering: Vec<usize>,

    /// Verdict for `best_ordering`.
    pub best_verdict: Option<Verdict>,

    /// Makespan of `best_ordering`.
    pub best_makespan: Option<f64>,

    /// Index of the restart that produced the best ordering.
    pub best_run: Option<usize>,

    /// Per-restart records, by restart index.
    pub runs: Vec<RunRecord>,

    /// Wall time of the whole call.
    pub elapsed: Duration,
}

impl MultiStartResult {
    /// Number of restarts that ended with a complete, feasible ordering.
    pub fn feasible_runs(&self) -> usize {
        self.runs.iter().filter(|r| r.makespan.is_some()).count()
    }

    /// Mean final makespan over the feasible restarts.
    pub fn mean_makespan(&self) -> Option<f64> {
        let values: Vec<f64> = self.runs.iter().filter_map(|r| r.makespan).collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Percentage gap of the best makespan above `reference`.
    ///
    /// `None` without a best ordering or for a non-positive reference.
    pub fn gap_percent(&self, reference: f64) -> Option<f64> {
        if reference <= 0.0 {
            return None;
        }
        self.best_makespan
            .map(|best| (best - reference) / reference * 100.0)
    }
}

/// A finished restart.
struct Restart {
    record: RunRecord,
    ordering: Vec<usize>,
    verdict: Verdict,
}

/// Runs randomized construction `config.runs` times and keeps the best.
///
/// Ties on makespan go to the lowest restart index.
///
/// # Errors
///
/// [`SearchError::InvalidConfig`] if `config` fails validation.
///
/// # Examples
///
/// ```
/// use u_sequencing::models::Instance;
/// use u_sequencing::constructive::{multi_start, MultiStartConfig};
/// use u_sequencing::local_search::Neighborhood;
///
/// let inst = Instance::from_rows(
///     vec![2.0, 3.0, 1.0, 2.0],
///     vec![
///         vec![0.0, 1.0, 4.0, 2.0],
///         vec![2.0, 0.0, 1.0, 3.0],
///         vec![1.0, 2.0, 0.0, 1.0],
///         vec![3.0, 1.0, 2.0, 0.0],
///     ],
///     vec![vec![-1.0; 4]; 4],
/// )
/// .unwrap();
///
/// let config = MultiStartConfig::default()
///     .with_runs(8)
///     .with_neighborhoods(vec![Neighborhood::JobBest])
///     .with_seed(3);
/// let result = multi_start(&inst, &config).unwrap();
/// assert_eq!(result.runs.len(), 8);
/// assert!(result.best_verdict.unwrap().is_feasible());
/// ```
pub fn multi_start(
    instance: &Instance,
    config: &MultiStartConfig,
) -> Result<MultiStartResult, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    let started = Instant::now();
    let base = config.seed.unwrap_or_else(rand::random);

    debug!(
        "multi-start: {} runs, {} strategy, base seed {base}",
        config.runs,
        config.strategy.name()
    );

    let seed_of = |k: usize| base.wrapping_add(k as u64);

    #[cfg(feature = "parallel")]
    let restarts: Vec<Restart> = (0..config.runs)
        .into_par_iter()
        .map(|k| restart(instance, config, k, seed_of(k)))
        .collect::<Result<_, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let restarts: Vec<Restart> = (0..config.runs)
        .map(|k| restart(instance, config, k, seed_of(k)))
        .collect::<Result<_, _>>()?;

    let mut best: Option<(f64, usize)> = None;
    for (k, r) in restarts.iter().enumerate() {
        if let Some(m) = r.record.makespan {
            if best.is_none_or(|(b, _)| m < b) {
                best = Some((m, k));
            }
        }
    }

    let mut runs = Vec::with_capacity(restarts.len());
    let mut best_ordering = Vec::new();
    let mut best_verdict = None;
    for (k, r) in restarts.into_iter().enumerate() {
        if best.is_some_and(|(_, b)| b == k) {
            best_ordering = r.ordering;
            best_verdict = Some(r.verdict);
        }
        runs.push(r.record);
    }

    let result = MultiStartResult {
        best_ordering,
        best_verdict,
        best_makespan: best.map(|(m, _)| m),
        best_run: best.map(|(_, k)| k),
        runs,
        elapsed: started.elapsed(),
    };

    debug!(
        "multi-start: best {:?} from run {:?}, {} of {} feasible, {:?}",
        result.best_makespan,
        result.best_run,
        result.feasible_runs(),
        config.runs,
        result.elapsed
    );

    Ok(result)
}

/// One construction plus its local search chain.
fn restart(
    instance: &Instance,
    config: &MultiStartConfig,
    run: usize,
    seed: u64,
) -> Result<Restart, SearchError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let built = grasp_build(instance, &config.strategy, &[], config.rcl, &mut rng);
    let complete = built.is_complete();
    let constructed = built.makespan();
    let BuildResult {
        mut ordering,
        mut verdict,
        ..
    } = built;

    if complete {
        for &neighborhood in &config.neighborhoods {
            let polished = improve(
                instance,
                &ordering,
                neighborhood,
                &config.local_search,
                &mut rng,
            )?;
            ordering = polished.ordering;
            verdict = polished.verdict;
        }
    }

    let makespan = if complete { verdict.makespan() } else { None };
    trace!("run {run} (seed {seed}): constructed {constructed:?}, final {makespan:?}");

    Ok(Restart {
        record: RunRecord {
            run,
            seed,
            constructed,
            makespan,
            complete,
        },
        ordering,
        verdict,
    })
}
