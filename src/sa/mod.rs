//! Simulated Annealing (SA) for the capacitated minimum spanning tree.
//!
//! The annealer walks the space of feasible trees one reparenting move
//! at a time. Cheaper neighbors are always taken; more expensive ones
//! are taken with probability `exp(-delta / (Kb * T))`. The temperature
//! drops geometrically after each stage and the search stops when the
//! time budget runs out.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

mod config;
mod runner;
mod stats;
mod types;

pub use config::{AcceptanceRule, AnnealConfig, IterationSchedule};
pub use runner::{acceptance_probability, AnnealResult, AnnealRunner};
pub use stats::{RunStatistics, Transition};
pub use types::{AnnealObserver, NoopObserver, ProgressSample, StageSummary};
