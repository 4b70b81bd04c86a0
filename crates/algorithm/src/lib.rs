//! UCB1 selection policy and per-banner event aggregation
//!
//! Two pure, deterministic pieces with no I/O of their own:
//! - [`selector`]: the Upper Confidence Bound policy that picks an arm
//!   given impression/reward vectors.
//! - [`aggregator`]: collapses rotation membership and raw event rows
//!   into the parallel vectors the selector consumes.

pub mod aggregator;
pub mod selector;

pub use aggregator::{aggregate, AggregatedArms};
pub use selector::{select_arm, Ucb1};
