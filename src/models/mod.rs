//! Domain model types for single-machine sequencing.
//!
//! Provides the immutable problem instance (processing times, setup matrix,
//! precedence delays), the timed schedule derived from an ordering, and the
//! feasibility verdict produced by the evaluator.

mod instance;
mod matrix;
mod schedule;
mod verdict;

pub use instance::{Instance, InstanceError, NO_DELAY};
pub use matrix::TimeMatrix;
pub use schedule::{Schedule, ScheduledJob};
pub use verdict::{Verdict, Violation, ViolationType};
