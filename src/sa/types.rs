//! Observation hooks for an annealing run.

use std::time::Duration;

/// A snapshot of the search, emitted periodically and on every
/// incumbent improvement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    /// Zero-based index of the iteration that produced the sample.
    pub iteration: u64,
    /// Time since the run started.
    pub elapsed: Duration,
    /// Temperature of the current stage.
    pub temperature: f64,
    /// Objective of the current tree.
    pub current: i64,
    /// Best objective seen so far, including the current tree.
    pub best: i64,
}

/// Summary of one finished temperature stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSummary {
    /// Zero-based stage index.
    pub stage: u64,
    /// Temperature the stage ran at.
    pub temperature: f64,
    /// Iterations executed in the stage.
    pub iterations: u64,
    /// Objective of the current tree at the end of the stage.
    pub current: i64,
    /// Best objective at the end of the stage.
    pub best: i64,
}

/// Receives progress from the annealer.
///
/// Observers only watch: nothing they do feeds back into the search.
/// Both methods default to no-ops.
pub trait AnnealObserver {
    fn on_progress(&mut self, _sample: &ProgressSample) {}

    fn on_stage_complete(&mut self, _stage: &StageSummary) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AnnealObserver for NoopObserver {}
