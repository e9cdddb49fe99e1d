//! SA execution loop for the CMST.

use super::config::{AcceptanceRule, AnnealConfig};
use super::stats::{RunStatistics, Transition};
use super::types::{AnnealObserver, NoopObserver, ProgressSample, StageSummary};
use crate::error::Result;
use crate::instance::ProblemInstance;
use crate::neighbor::{is_frozen, NeighborGenerator};
use crate::random::rng_from_seed;
use crate::tree::TreeState;
use rand::Rng;
use std::time::Instant;

/// Below this the Metropolis exponent is treated as zero probability.
const MIN_EXPONENT: f64 = -745.0;

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct AnnealResult {
    /// The cheapest feasible tree found.
    pub best: TreeState,

    /// Objective of `best`.
    pub best_cost: i64,

    /// Run counters.
    pub stats: RunStatistics,

    /// Best cost at the start and after every stage. Non-increasing.
    pub cost_history: Vec<i64>,
}

/// Probability of accepting a candidate that is `delta` more expensive
/// at temperature `temperature`.
///
/// Returns 1 for non-positive deltas and exactly 0 once the exponent
/// `-delta / (kb * temperature)` drops below the range of `f64::exp`,
/// including when `kb * temperature` is zero or not finite.
pub fn acceptance_probability(delta: i64, kb: f64, temperature: f64) -> f64 {
    if delta <= 0 {
        return 1.0;
    }
    let scale = kb * temperature;
    if !(scale > 0.0 && scale.is_finite()) {
        return 0.0;
    }
    let exponent = -(delta as f64) / scale;
    if exponent < MIN_EXPONENT {
        return 0.0;
    }
    exponent.exp()
}

impl AcceptanceRule {
    /// Decides whether a candidate `delta` more expensive than the current
    /// tree is accepted. Draws one uniform number for `Metropolis`, none
    /// for `RandomWalk`.
    pub fn accepts<R: Rng>(&self, delta: i64, kb: f64, temperature: f64, rng: &mut R) -> bool {
        match self {
            AcceptanceRule::Metropolis => {
                let u: f64 = rng.random();
                u < acceptance_probability(delta, kb, temperature)
            }
            AcceptanceRule::RandomWalk => true,
        }
    }
}

/// Executes simulated annealing on a CMST instance.
///
/// The search starts from the star tree. Each stage runs a number of
/// iterations given by the configured [`IterationSchedule`] at a fixed
/// temperature, then cools by `reduction_factor`. The time budget and
/// the optional stage limit are checked between stages only.
///
/// [`IterationSchedule`]: super::IterationSchedule
pub struct AnnealRunner;

impl AnnealRunner {
    /// Runs the search.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_cmst::instance::ProblemInstance;
    /// use u_cmst::sa::{AnnealConfig, AnnealRunner, IterationSchedule};
    ///
    /// let instance = ProblemInstance::parse_str(2, "2\n0 1 9\n1 0 9\n9 9 0\n").unwrap();
    /// let config = AnnealConfig::default()
    ///     .with_initial_temperature(10.0)
    ///     .with_kb(1.0)
    ///     .with_schedule(IterationSchedule::Fixed { iterations: 200 })
    ///     .with_max_stages(20)
    ///     .with_seed(1);
    ///
    /// let result = AnnealRunner::run(&instance, &config).unwrap();
    /// assert_eq!(result.best_cost, 10);
    /// ```
    pub fn run(instance: &ProblemInstance, config: &AnnealConfig) -> Result<AnnealResult> {
        Self::run_with_observer(instance, config, &mut NoopObserver)
    }

    /// Runs the search, reporting progress to `observer`.
    pub fn run_with_observer<O: AnnealObserver + ?Sized>(
        instance: &ProblemInstance,
        config: &AnnealConfig,
        observer: &mut O,
    ) -> Result<AnnealResult> {
        let mut rng = rng_from_seed(config.seed);
        Self::run_with_rng(instance, config, &mut rng, observer)
    }

    /// Runs the search drawing from a caller-supplied generator.
    ///
    /// The configured seed is ignored.
    pub fn run_with_rng<R: Rng, O: AnnealObserver + ?Sized>(
        instance: &ProblemInstance,
        config: &AnnealConfig,
        rng: &mut R,
        observer: &mut O,
    ) -> Result<AnnealResult> {
        config.validate()?;
        let start = Instant::now();
        let generator = NeighborGenerator::new(config.max_neighbor_attempts);

        let mut current = TreeState::star(instance);
        let mut candidate = current.clone();
        let mut best = current.clone();
        let mut stats = RunStatistics::new(config);
        let mut cost_history = vec![best.objective()];
        let mut temperature = config.initial_temperature;

        tracing::info!(
            clients = instance.clients(),
            capacity = instance.capacity(),
            initial_cost = current.objective(),
            budget_secs = config.time_budget.as_secs_f64(),
            "annealing started"
        );

        if is_frozen(instance) {
            tracing::info!("the star is the only feasible tree; nothing to search");
            stats.elapsed = start.elapsed();
            return Ok(AnnealResult {
                best_cost: best.objective(),
                best,
                stats,
                cost_history,
            });
        }

        while start.elapsed() < config.time_budget
            && config.max_stages.is_none_or(|limit| stats.stages < limit)
        {
            let iterations = config.schedule.iterations(temperature, instance.capacity());

            for _ in 0..iterations {
                generator.generate(&current, &mut candidate, instance, rng)?;
                let delta = candidate.objective() - current.objective();

                let transition = if delta < 0 {
                    Transition::Improving
                } else if config.acceptance.accepts(delta, config.kb, temperature, rng) {
                    Transition::Worsening
                } else {
                    Transition::Rejected
                };
                if transition != Transition::Rejected {
                    std::mem::swap(&mut current, &mut candidate);
                }

                let iteration = stats.total_iterations;
                stats.record(transition);

                let improved = current.objective() < best.objective();
                let periodic = config
                    .progress_interval
                    .is_some_and(|interval| iteration % interval == 0);
                if periodic || improved {
                    stats.progress_samples += 1;
                    observer.on_progress(&ProgressSample {
                        iteration,
                        elapsed: start.elapsed(),
                        temperature,
                        current: current.objective(),
                        best: best.objective().min(current.objective()),
                    });
                }

                if improved {
                    best.clone_from(&current);
                    stats.incumbent_improvements += 1;
                }
            }

            observer.on_stage_complete(&StageSummary {
                stage: stats.stages,
                temperature,
                iterations,
                current: current.objective(),
                best: best.objective(),
            });
            tracing::debug!(
                stage = stats.stages,
                temperature,
                iterations,
                current = current.objective(),
                best = best.objective(),
                "stage complete"
            );

            cost_history.push(best.objective());
            temperature *= config.reduction_factor;
            stats.stages += 1;
        }

        stats.final_temperature = temperature;
        stats.elapsed = start.elapsed();

        tracing::info!(
            best_cost = best.objective(),
            stages = stats.stages,
            iterations = stats.total_iterations,
            improvements = stats.incumbent_improvements,
            elapsed_secs = stats.elapsed.as_secs_f64(),
            "annealing finished"
        );

        Ok(AnnealResult {
            best_cost: best.objective(),
            best,
            stats,
            cost_history,
        })
    }
}
