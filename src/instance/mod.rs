//! CMST problem instances.
//!
//! An instance is a capacity bound plus a square cost matrix over the
//! client nodes `0..N` and the depot, which always carries id `N`.
//! Instances are immutable once constructed.

mod loader;
mod types;

pub use types::ProblemInstance;
