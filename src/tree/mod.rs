//! Spanning-tree state for the CMST search.
//!
//! Trees are stored as parent pointers over node ids with a per-node
//! count of proper descendants, so capacity checks on top-level
//! subtrees are O(depth) rather than O(N).

mod state;

pub use state::TreeState;
