//! Capacitated minimum spanning tree (CMST) search by simulated annealing.
//!
//! Given a depot, `N` client nodes and a symmetric cost matrix, find a
//! spanning tree rooted at the depot in which every subtree hanging
//! directly off the depot has at most `C` nodes, at minimum total cost.
//!
//! - [`instance`]: the immutable cost matrix and capacity.
//! - [`tree`]: parent-pointer tree state with subtree-size counters.
//! - [`neighbor`]: feasible single-edge reparenting moves.
//! - [`sa`]: the annealer, its configuration and run statistics.
//! - [`mst`]: the unconstrained minimum spanning tree, a lower bound.
//! - [`report`]: Graphviz output, run summary and progress CSV.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use u_cmst::instance::ProblemInstance;
//! use u_cmst::sa::{AnnealConfig, AnnealRunner, IterationSchedule};
//!
//! let input = "3\n0 2 9 10\n2 0 9 10\n9 9 0 4\n10 10 4 0\n";
//! let instance = ProblemInstance::parse_str(2, input).unwrap();
//! let config = AnnealConfig::default()
//!     .with_initial_temperature(20.0)
//!     .with_kb(1.0)
//!     .with_schedule(IterationSchedule::Fixed { iterations: 300 })
//!     .with_time_budget(Duration::from_secs(5))
//!     .with_max_stages(30)
//!     .with_seed(3);
//!
//! let result = AnnealRunner::run(&instance, &config).unwrap();
//! result.best.check_invariants(&instance).unwrap();
//! assert_eq!(result.best_cost, 16);
//! ```

pub mod error;
pub mod instance;
pub mod mst;
pub mod neighbor;
pub mod random;
pub mod report;
pub mod sa;
pub mod tree;

pub use error::{CmstError, Result};
