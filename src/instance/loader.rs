//! Text input: the node count followed by the cost matrix.
//!
//! The format is whitespace-separated integers: `N`, then `(N+1)^2`
//! matrix entries in row-major order with the depot at index `N`.

use super::types::ProblemInstance;
use crate::error::{CmstError, Result};
use std::io::Read;

impl ProblemInstance {
    /// Parses an instance from text.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_cmst::instance::ProblemInstance;
    ///
    /// let instance = ProblemInstance::parse_str(1, "1\n0 7\n7 0\n").unwrap();
    /// assert_eq!(instance.cost(0, 1), 7);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error on non-integer tokens, a non-positive node count,
    /// a matrix with the wrong number of entries, or a bad capacity.
    pub fn parse_str(capacity: i64, input: &str) -> Result<Self> {
        let mut tokens = input.split_whitespace().enumerate();

        let (position, token) = tokens.next().ok_or(CmstError::MatrixSize {
            expected: 1,
            found: 0,
        })?;
        let clients = parse_token(position, token)?;
        if clients <= 0 {
            return Err(CmstError::InvalidNodeCount(clients));
        }
        let clients = clients as usize;
        let dim = clients + 1;
        let expected = dim.saturating_mul(dim);

        let costs = tokens
            .map(|(position, token)| parse_token(position, token))
            .collect::<Result<Vec<i64>>>()?;
        if costs.len() != expected {
            return Err(CmstError::MatrixSize {
                expected,
                found: costs.len(),
            });
        }

        tracing::debug!(clients, capacity, "parsed cost matrix");
        Self::new(clients, capacity, costs)
    }

    /// Reads and parses an instance from `reader` until end of input.
    pub fn from_reader<R: Read>(capacity: i64, mut reader: R) -> Result<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::parse_str(capacity, &input)
    }
}

fn parse_token(position: usize, token: &str) -> Result<i64> {
    token.parse::<i64>().map_err(|_| CmstError::MalformedToken {
        position,
        token: token.to_string(),
    })
}
