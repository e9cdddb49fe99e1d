//! Counters collected during an annealing run.

use super::config::AnnealConfig;
use std::time::Duration;

/// Outcome of one acceptance decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The candidate was cheaper and replaced the current tree.
    Improving,
    /// The candidate was not cheaper but was accepted anyway.
    Worsening,
    /// The candidate was discarded.
    Rejected,
}

/// Statistics of a finished run.
///
/// Every iteration makes exactly one acceptance decision, so
/// `improving_transitions + worsening_transitions + rejected_transitions`
/// always equals `total_iterations`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunStatistics {
    pub initial_temperature: f64,
    pub final_temperature: f64,
    pub reduction_factor: f64,
    pub kb: f64,
    /// Completed temperature stages, i.e. temperature changes.
    pub stages: u64,
    pub total_iterations: u64,
    pub improving_transitions: u64,
    pub worsening_transitions: u64,
    pub rejected_transitions: u64,
    /// How many times the best tree was replaced.
    pub incumbent_improvements: u64,
    /// Progress samples handed to the observer.
    pub progress_samples: u64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl RunStatistics {
    pub(crate) fn new(config: &AnnealConfig) -> Self {
        Self {
            initial_temperature: config.initial_temperature,
            final_temperature: config.initial_temperature,
            reduction_factor: config.reduction_factor,
            kb: config.kb,
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, transition: Transition) {
        match transition {
            Transition::Improving => self.improving_transitions += 1,
            Transition::Worsening => self.worsening_transitions += 1,
            Transition::Rejected => self.rejected_transitions += 1,
        }
        self.total_iterations += 1;
    }

    /// Fraction of iterations that moved the current tree.
    pub fn acceptance_ratio(&self) -> f64 {
        if self.total_iterations == 0 {
            return 0.0;
        }
        (self.improving_transitions + self.worsening_transitions) as f64
            / self.total_iterations as f64
    }
}
