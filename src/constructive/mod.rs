//! Constructive heuristics for building orderings.
//!
//! All builders share one loop: rank the unplaced jobs with a
//! [`ScoringStrategy`](crate::scoring::ScoringStrategy), append the first
//! candidate that keeps the ordering feasible, refresh the scores, repeat.
//!
//! - [`greedy_build`] — Deterministic, tries candidates in rank order
//! - [`grasp_build`] — Randomized over a restricted candidate list (Feo & Resende, 1995)
//! - [`multi_start`] — Repeated GRASP with optional local search, keeps the best

mod builder;
mod grasp;
mod greedy;
mod multi_start;

pub use builder::{BuildResult, BuildStatus};
pub use grasp::{grasp_build, RclPolicy};
pub use greedy::greedy_build;
pub use multi_start::{multi_start, MultiStartConfig, MultiStartResult, RunRecord};
