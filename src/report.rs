//! Text output: the best tree, the run summary and the progress stream.

use crate::sa::{AnnealConfig, AnnealObserver, AnnealResult, ProgressSample};
use crate::tree::TreeState;
use std::io::{self, Write};

/// Writes `tree` as an undirected Graphviz graph, one `child -- parent;`
/// line per client.
pub fn write_dot<W: Write>(out: &mut W, tree: &TreeState) -> io::Result<()> {
    writeln!(out, "graph cmst {{")?;
    for (node, parent) in tree.edges() {
        writeln!(out, "{node} -- {parent};")?;
    }
    writeln!(out, "}}")
}

/// Writes the best cost, the tree, and the run parameters and counters.
///
/// `lower_bound`, when given, is printed with the relative gap of the
/// best cost above it.
pub fn write_report<W: Write>(
    out: &mut W,
    result: &AnnealResult,
    config: &AnnealConfig,
    lower_bound: Option<i64>,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "BEST SOLUTION: {}", result.best_cost)?;
    writeln!(out)?;
    write_dot(out, &result.best)?;
    writeln!(out)?;

    let stats = &result.stats;
    writeln!(out, "Initial temperature: {}", stats.initial_temperature)?;
    writeln!(out, "Reduction factor: {}", stats.reduction_factor)?;
    writeln!(out, "Kb: {}", stats.kb)?;
    writeln!(out, "Equilibrium iterations: {}", config.schedule)?;
    writeln!(
        out,
        "Time budget (seconds): {:.3}",
        config.time_budget.as_secs_f64()
    )?;
    writeln!(
        out,
        "Execution time (seconds): {:.3}",
        stats.elapsed.as_secs_f64()
    )?;
    writeln!(out)?;
    writeln!(out, "Number of temperature changes: {}", stats.stages)?;
    writeln!(out, "Final temperature: {}", stats.final_temperature)?;
    writeln!(out, "Total number of iterations: {}", stats.total_iterations)?;
    writeln!(
        out,
        "Transitions to a better state: {}",
        stats.improving_transitions
    )?;
    writeln!(
        out,
        "Transitions to a worse state: {}",
        stats.worsening_transitions
    )?;
    writeln!(
        out,
        "Iterations without transition: {}",
        stats.rejected_transitions
    )?;
    writeln!(out, "Acceptance ratio: {:.4}", stats.acceptance_ratio())?;
    writeln!(
        out,
        "How many times a better solution was found: {}",
        stats.incumbent_improvements
    )?;
    if let Some(bound) = lower_bound {
        match relative_gap(result.best_cost, bound) {
            Some(gap) => writeln!(
                out,
                "Unconstrained MST lower bound: {bound} (gap {:.2}%)",
                gap * 100.0
            )?,
            None => writeln!(out, "Unconstrained MST lower bound: {bound}")?,
        }
    }
    writeln!(out)
}

/// `(cost - bound) / |bound|`, or `None` when the bound is zero.
fn relative_gap(cost: i64, bound: i64) -> Option<f64> {
    if bound == 0 {
        return None;
    }
    Some((cost - bound) as f64 / (bound as f64).abs())
}

/// Observer that writes every progress sample as a CSV line:
/// `iteration,elapsed_secs,temperature,current,best`.
///
/// Write failures do not stop the search; the first one is kept and
/// returned by [`finish`](Self::finish).
pub struct CsvProgressWriter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> CsvProgressWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Flushes the stream and returns it, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> AnnealObserver for CsvProgressWriter<W> {
    fn on_progress(&mut self, sample: &ProgressSample) {
        if self.error.is_some() {
            return;
        }
        let written = writeln!(
            self.out,
            "{},{:.4},{:.4},{},{}",
            sample.iteration,
            sample.elapsed.as_secs_f64(),
            sample.temperature,
            sample.current,
            sample.best
        );
        if let Err(err) = written {
            tracing::warn!(error = %err, "progress stream failed; further samples dropped");
            self.error = Some(err);
        }
    }
}
