//! Neighborhood of a CMST tree.
//!
//! A neighbor is obtained by cutting one client (with its subtree) from
//! its parent and hanging it under another node, provided the result is
//! still a tree and no top-level subtree exceeds the capacity.

mod generator;

pub use generator::{is_feasible_move, is_frozen, Move, NeighborGenerator, DEFAULT_MAX_ATTEMPTS};
