//! SA configuration: temperature, stage length and acceptance.

use crate::error::{CmstError, Result};
use std::fmt;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of iterations run at each temperature stage.
///
/// Both variants never return fewer than one iteration per stage.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum IterationSchedule {
    /// The same number of iterations at every temperature.
    Fixed {
        /// Iterations per stage. Must be positive.
        iterations: u64,
    },

    /// Iterations grow with temperature:
    /// `max(floor, coefficient * (C / capacity_reference)^capacity_exponent * T^exponent)`.
    ///
    /// Hot stages explore longer; cold stages settle at `floor`.
    Adaptive {
        /// Overall scale of the stage length.
        coefficient: f64,
        /// Power applied to the temperature. Positive.
        exponent: f64,
        /// Capacity at which the capacity factor equals one.
        capacity_reference: f64,
        /// Power applied to `C / capacity_reference`; larger capacities
        /// open larger neighborhoods.
        capacity_exponent: f64,
        /// Minimum iterations per stage. Must be positive.
        floor: u64,
    },
}

impl Default for IterationSchedule {
    fn default() -> Self {
        IterationSchedule::Adaptive {
            coefficient: 1100.0,
            exponent: 0.5,
            capacity_reference: 5.0,
            capacity_exponent: 0.4,
            floor: 10_000,
        }
    }
}

impl IterationSchedule {
    /// Iterations for a stage at `temperature` on an instance with the
    /// given capacity.
    pub fn iterations(&self, temperature: f64, capacity: usize) -> u64 {
        match *self {
            IterationSchedule::Fixed { iterations } => iterations,
            IterationSchedule::Adaptive {
                coefficient,
                exponent,
                capacity_reference,
                capacity_exponent,
                floor,
            } => {
                let capacity_factor = (capacity as f64 / capacity_reference).powf(capacity_exponent);
                let scaled = coefficient * capacity_factor * temperature.max(0.0).powf(exponent);
                // NaN falls back to the floor; `as` saturates large values.
                scaled.max(floor as f64) as u64
            }
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            IterationSchedule::Fixed { iterations } => {
                if iterations == 0 {
                    return Err(invalid("fixed schedule needs at least one iteration"));
                }
            }
            IterationSchedule::Adaptive {
                coefficient,
                exponent,
                capacity_reference,
                capacity_exponent,
                floor,
            } => {
                if !(coefficient > 0.0 && coefficient.is_finite()) {
                    return Err(invalid(format!(
                        "adaptive coefficient must be positive, got {coefficient}"
                    )));
                }
                if !(exponent > 0.0 && exponent.is_finite()) {
                    return Err(invalid(format!(
                        "adaptive exponent must be positive, got {exponent}"
                    )));
                }
                if !(capacity_reference > 0.0 && capacity_reference.is_finite()) {
                    return Err(invalid(format!(
                        "capacity_reference must be positive, got {capacity_reference}"
                    )));
                }
                if !(capacity_exponent >= 0.0 && capacity_exponent.is_finite()) {
                    return Err(invalid(format!(
                        "capacity_exponent must be non-negative, got {capacity_exponent}"
                    )));
                }
                if floor == 0 {
                    return Err(invalid("adaptive floor must be positive"));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for IterationSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterationSchedule::Fixed { iterations } => write!(f, "fixed ({iterations} per stage)"),
            IterationSchedule::Adaptive {
                coefficient,
                exponent,
                capacity_reference,
                capacity_exponent,
                floor,
            } => write!(
                f,
                "adaptive (max({floor}, {coefficient} * (C/{capacity_reference})^{capacity_exponent} * T^{exponent}))"
            ),
        }
    }
}

/// How a non-improving candidate is judged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AcceptanceRule {
    /// Accept with probability `exp(-delta / (Kb * T))`.
    #[default]
    Metropolis,

    /// Accept every candidate. Turns the search into a random walk that
    /// only remembers the best tree it passed through.
    RandomWalk,
}

/// Configuration for the CMST annealer.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_cmst::sa::{AnnealConfig, IterationSchedule};
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(5_000.0)
///     .with_reduction_factor(0.95)
///     .with_schedule(IterationSchedule::Fixed { iterations: 500 })
///     .with_time_budget(Duration::from_millis(200))
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "snake_case"))]
pub struct AnnealConfig {
    /// Temperature of the first stage.
    pub initial_temperature: f64,

    /// Factor in (0, 1) applied to the temperature after every stage.
    pub reduction_factor: f64,

    /// Scale of cost deltas in the acceptance test, the `Kb` in
    /// `exp(-delta / (Kb * T))`.
    pub kb: f64,

    /// Stage length policy.
    pub schedule: IterationSchedule,

    /// Acceptance policy for non-improving candidates.
    pub acceptance: AcceptanceRule,

    /// Wall-clock budget. Checked between stages, so a run overshoots by
    /// at most one stage.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub time_budget: Duration,

    /// Hard limit on the number of stages. `None` = time budget only.
    pub max_stages: Option<u64>,

    /// Emit a progress sample every this many iterations, in addition to
    /// one per incumbent improvement. `None` disables periodic samples.
    pub progress_interval: Option<u64>,

    /// Draws allowed per neighbor before the run fails.
    pub max_neighbor_attempts: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1_500_000.0,
            reduction_factor: 0.98,
            kb: 5e-5,
            schedule: IterationSchedule::default(),
            acceptance: AcceptanceRule::default(),
            time_budget: Duration::from_secs(10),
            max_stages: None,
            progress_interval: Some(10_000),
            max_neighbor_attempts: crate::neighbor::DEFAULT_MAX_ATTEMPTS,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_reduction_factor(mut self, factor: f64) -> Self {
        self.reduction_factor = factor;
        self
    }

    pub fn with_kb(mut self, kb: f64) -> Self {
        self.kb = kb;
        self
    }

    pub fn with_schedule(mut self, schedule: IterationSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_acceptance(mut self, acceptance: AcceptanceRule) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    pub fn with_max_stages(mut self, stages: u64) -> Self {
        self.max_stages = Some(stages);
        self
    }

    pub fn with_progress_interval(mut self, interval: Option<u64>) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_max_neighbor_attempts(mut self, attempts: usize) -> Self {
        self.max_neighbor_attempts = attempts;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature > 0.0 && self.initial_temperature.is_finite()) {
            return Err(invalid(format!(
                "initial_temperature must be positive, got {}",
                self.initial_temperature
            )));
        }
        if !(self.reduction_factor > 0.0 && self.reduction_factor < 1.0) {
            return Err(invalid(format!(
                "reduction_factor must be in (0, 1), got {}",
                self.reduction_factor
            )));
        }
        if !(self.kb > 0.0 && self.kb.is_finite()) {
            return Err(invalid(format!("kb must be positive, got {}", self.kb)));
        }
        if self.progress_interval == Some(0) {
            return Err(invalid("progress_interval must be positive"));
        }
        if self.max_neighbor_attempts == 0 {
            return Err(invalid("max_neighbor_attempts must be positive"));
        }
        self.schedule.validate()
    }
}

#[cfg(feature = "cli")]
impl AnnealConfig {
    /// Parses and validates a configuration from TOML.
    ///
    /// Missing keys keep their defaults. The time budget is not part of
    /// the file format.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

fn invalid(message: impl Into<String>) -> CmstError {
    CmstError::InvalidConfig(message.into())
}
