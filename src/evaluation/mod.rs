//! Ordering evaluation: feasibility checking and schedule timing.
//!
//! - [`Evaluator`] / [`evaluate`] — verdict, schedule and makespan for an ordering
//! - [`first_accepted`], [`first_feasible`], [`best_accepted`] — candidate scans
//!   shared by the constructive and local search modules

mod evaluator;
mod scan;

pub use evaluator::{evaluate, Evaluator, TOLERANCE};
pub use scan::{best_accepted, first_accepted, first_feasible};
