//! # u-sequencing
//!
//! Single-machine sequencing with sequence-dependent setup times and
//! precedence delays: feasibility evaluation, constructive heuristics,
//! multi-start GRASP and local search, all minimizing makespan.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Instance, Schedule, Verdict, Violation)
//! - [`evaluation`] — Ordering feasibility checking and timing
//! - [`scoring`] — Ranking strategies (earliest start, earliest finish, latest finish)
//! - [`constructive`] — Greedy and GRASP builders, multi-start orchestration
//! - [`local_search`] — Exchange, job reinsertion and block reinsertion operators
//! - [`io`] — Text instance format and JSON interchange
//!
//! ## Example
//!
//! ```
//! use u_sequencing::models::Instance;
//! use u_sequencing::constructive::greedy_build;
//! use u_sequencing::local_search::{insert_job_best, LocalSearchConfig};
//! use u_sequencing::scoring::Strategy;
//! use rand::SeedableRng;
//!
//! let inst = Instance::from_rows(
//!     vec![3.0, 2.0, 4.0],
//!     vec![
//!         vec![0.0, 1.0, 2.0],
//!         vec![5.0, 0.0, 1.0],
//!         vec![1.0, 3.0, 0.0],
//!     ],
//!     vec![
//!         vec![-1.0, -1.0, 6.0],
//!         vec![-1.0, -1.0, -1.0],
//!         vec![-1.0, -1.0, -1.0],
//!     ],
//! )
//! .unwrap();
//!
//! let built = greedy_build(&inst, &Strategy::EarliestFinish, &[]);
//! assert!(built.is_complete());
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let config = LocalSearchConfig::default().with_max_stagnation(100);
//! let polished = insert_job_best(&inst, &built.ordering, &config, &mut rng).unwrap();
//! assert!(polished.makespan <= built.makespan().unwrap());
//! ```

pub mod constructive;
pub mod evaluation;
pub mod io;
pub mod local_search;
pub mod models;
pub mod scoring;
