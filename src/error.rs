//! Error type shared by loading, configuration and search.

use thiserror::Error;

/// Errors raised while loading an instance, validating a configuration,
/// or running the search.
#[derive(Debug, Error)]
pub enum CmstError {
    /// Capacity bound must be a positive integer.
    #[error("capacity must be positive, got {0}")]
    InvalidCapacity(i64),

    /// Node count must be a positive integer.
    #[error("node count must be positive, got {0}")]
    InvalidNodeCount(i64),

    /// A token in the input could not be parsed as an integer.
    #[error("malformed token {token:?} at position {position}")]
    MalformedToken { position: usize, token: String },

    /// The cost matrix does not have `(N+1)^2` entries.
    #[error("cost matrix needs {expected} values, found {found}")]
    MatrixSize { expected: usize, found: usize },

    /// Costs are large enough that a tree objective or a cost delta could
    /// leave the `i64` range.
    #[error("cost magnitude {max_cost} is too large for {nodes} nodes")]
    CostOverflow { max_cost: u64, nodes: usize },

    /// Annealing parameters are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Rejection sampling could not find a feasible move.
    #[error("no feasible neighbor found after {attempts} attempts")]
    NeighborhoodExhausted { attempts: usize },

    /// A tree state failed its structural checks.
    #[error("tree invariant violated: {0}")]
    InvariantViolation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "cli")]
    #[error("TOML parse error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CmstError>;
