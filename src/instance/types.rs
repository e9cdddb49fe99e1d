//! The immutable problem definition.

use crate::error::{CmstError, Result};

/// Cost matrix and capacity bound for one CMST instance.
///
/// Node ids `0..clients` are clients; id `clients` is the depot. The
/// matrix is stored row-major with `clients + 1` rows and columns.
///
/// # Examples
///
/// ```
/// use u_cmst::instance::ProblemInstance;
///
/// let instance = ProblemInstance::from_rows(
///     2,
///     &[vec![0, 4, 1], vec![4, 0, 2], vec![1, 2, 0]],
/// )
/// .unwrap();
/// assert_eq!(instance.clients(), 2);
/// assert_eq!(instance.depot(), 2);
/// assert_eq!(instance.cost(0, 2), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    clients: usize,
    capacity: usize,
    costs: Vec<i64>,
}

impl ProblemInstance {
    /// Creates an instance from a flat row-major matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` or `clients` is not positive, or if
    /// `costs` does not hold exactly `(clients + 1)^2` values, or if the
    /// costs are too large for tree objectives to fit in an `i64`.
    pub fn new(clients: usize, capacity: i64, costs: Vec<i64>) -> Result<Self> {
        if capacity <= 0 {
            return Err(CmstError::InvalidCapacity(capacity));
        }
        if clients == 0 {
            return Err(CmstError::InvalidNodeCount(0));
        }
        let dim = clients + 1;
        let expected = dim.saturating_mul(dim);
        if costs.len() != expected {
            return Err(CmstError::MatrixSize {
                expected,
                found: costs.len(),
            });
        }
        check_cost_range(dim, &costs)?;

        let instance = Self {
            clients,
            capacity: capacity as usize,
            costs,
        };
        if !instance.is_symmetric() {
            tracing::warn!(
                clients,
                "cost matrix is not symmetric; edges are priced as cost[child][parent]"
            );
        }
        Ok(instance)
    }

    /// Creates an instance from matrix rows.
    pub fn from_rows(capacity: i64, rows: &[Vec<i64>]) -> Result<Self> {
        let clients = rows.len().saturating_sub(1);
        let found: usize = rows.iter().map(Vec::len).sum();
        if rows.iter().any(|row| row.len() != rows.len()) {
            return Err(CmstError::MatrixSize {
                expected: rows.len() * rows.len(),
                found,
            });
        }
        Self::new(clients, capacity, rows.concat())
    }

    /// Number of client nodes `N`.
    #[inline]
    pub fn clients(&self) -> usize {
        self.clients
    }

    /// Id of the depot, equal to [`clients`](Self::clients).
    #[inline]
    pub fn depot(&self) -> usize {
        self.clients
    }

    /// Number of nodes including the depot.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.clients + 1
    }

    /// Maximum number of nodes in a subtree hanging off the depot.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cost of the edge between `i` and `j`.
    #[inline]
    pub fn cost(&self, i: usize, j: usize) -> i64 {
        self.costs[i * self.node_count() + j]
    }

    /// Whether `cost(i, j) == cost(j, i)` for every pair.
    pub fn is_symmetric(&self) -> bool {
        let dim = self.node_count();
        (0..dim).all(|i| (i + 1..dim).all(|j| self.cost(i, j) == self.cost(j, i)))
    }
}

/// Rejects matrices whose objectives could overflow.
///
/// An objective sums `N` edge costs and a delta subtracts two objectives,
/// so `2 * (N + 1) * max|cost|` must fit in an `i64`.
fn check_cost_range(dim: usize, costs: &[i64]) -> Result<()> {
    let max_cost = costs.iter().map(|c| c.unsigned_abs()).max().unwrap_or(0);
    let bound = (max_cost as u128) * 2 * dim as u128;
    if bound > i64::MAX as u128 {
        return Err(CmstError::CostOverflow {
            max_cost,
            nodes: dim,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Vec<i64>> {
        vec![vec![0, 4, 1], vec![4, 0, 2], vec![1, 2, 0]]
    }

    #[test]
    fn test_from_rows_accessors() {
        let instance = ProblemInstance::from_rows(3, &triangle()).unwrap();
        assert_eq!(instance.clients(), 2);
        assert_eq!(instance.node_count(), 3);
        assert_eq!(instance.depot(), 2);
        assert_eq!(instance.capacity(), 3);
        assert_eq!(instance.cost(0, 1), 4);
        assert_eq!(instance.cost(1, 2), 2);
        assert!(instance.is_symmetric());
    }

    #[test]
    fn test_rejects_non_positive_capacity() {
        assert!(matches!(
            ProblemInstance::from_rows(0, &triangle()),
            Err(CmstError::InvalidCapacity(0))
        ));
        assert!(matches!(
            ProblemInstance::from_rows(-4, &triangle()),
            Err(CmstError::InvalidCapacity(-4))
        ));
    }

    #[test]
    fn test_rejects_wrong_matrix_size() {
        let err = ProblemInstance::new(2, 1, vec![0; 8]).unwrap_err();
        assert!(matches!(
            err,
            CmstError::MatrixSize {
                expected: 9,
                found: 8
            }
        ));
    }

    #[test]
    fn test_rejects_overflowing_costs() {
        let big = 5_000_000_000_000_000_000;
        let rows = vec![vec![0, 1, big], vec![1, 0, big], vec![big, big, 0]];
        let err = ProblemInstance::from_rows(2, &rows).unwrap_err();
        assert!(matches!(
            err,
            CmstError::CostOverflow {
                max_cost: 5_000_000_000_000_000_000,
                nodes: 3
            }
        ));

        let rows = vec![vec![0, i64::MIN], vec![i64::MIN, 0]];
        assert!(matches!(
            ProblemInstance::from_rows(1, &rows),
            Err(CmstError::CostOverflow { .. })
        ));
    }

    #[test]
    fn test_accepts_large_costs_within_range() {
        let big = i64::MAX / 8;
        let rows = vec![vec![0, big, big], vec![big, 0, big], vec![big, big, 0]];
        let instance = ProblemInstance::from_rows(2, &rows).unwrap();
        assert_eq!(instance.cost(0, 2), big);
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let rows = vec![vec![0, 1], vec![1]];
        assert!(matches!(
            ProblemInstance::from_rows(1, &rows),
            Err(CmstError::MatrixSize { .. })
        ));
    }

    #[test]
    fn test_rejects_depot_only() {
        assert!(matches!(
            ProblemInstance::new(0, 1, vec![0]),
            Err(CmstError::InvalidNodeCount(0))
        ));
    }

    #[test]
    fn test_asymmetric_is_accepted() {
        let rows = vec![vec![0, 5], vec![3, 0]];
        let instance = ProblemInstance::from_rows(1, &rows).unwrap();
        assert!(!instance.is_symmetric());
    }
}
