//! Rejection sampling over single-edge reparenting moves.

use crate::error::{CmstError, Result};
use crate::instance::ProblemInstance;
use crate::tree::TreeState;
use rand::Rng;

/// Default cap on draws before neighbor generation gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1_000_000;

/// A single applied reparenting move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// The client that was moved, together with its subtree.
    pub node: usize,
    /// Its parent before the move.
    pub old_parent: usize,
    /// Its parent after the move.
    pub new_parent: usize,
}

/// Whether hanging `new_child` under `new_parent` yields a feasible tree.
///
/// The move must change the tree, must not create a cycle, and the
/// receiving top-level subtree must stay within the capacity. A move
/// inside one top-level subtree never changes its size; a move under
/// the depot opens a new top-level subtree of the moved size.
pub fn is_feasible_move(
    state: &TreeState,
    instance: &ProblemInstance,
    new_parent: usize,
    new_child: usize,
) -> bool {
    if new_parent == new_child
        || state.parent(new_child) == Some(new_parent)
        || state.is_ancestor(new_child, new_parent)
    {
        return false;
    }
    if state.same_top_subtree(new_parent, new_child) {
        return true;
    }

    let moved = state.descendants(new_child) + 1;
    let host = state
        .subtree_root(new_parent)
        .map_or(0, |root| state.descendants(root) + 1);
    host + moved <= instance.capacity()
}

/// Whether the star is the only feasible tree of `instance`.
///
/// With fewer than two clients, or a capacity below two, no client can
/// ever hang under another, so no move passes [`is_feasible_move`].
pub fn is_frozen(instance: &ProblemInstance) -> bool {
    instance.clients() < 2 || instance.capacity() < 2
}

/// Produces random feasible neighbors of a tree.
///
/// Pairs `(new_parent, new_child)` are drawn uniformly from all node ids,
/// depot included, parent first, until [`is_feasible_move`] accepts one.
/// The draw order is fixed so a seeded run is reproducible.
#[derive(Debug, Clone)]
pub struct NeighborGenerator {
    max_attempts: usize,
}

impl Default for NeighborGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl NeighborGenerator {
    /// Creates a generator that gives up after `max_attempts` draws.
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Draws a feasible `(new_parent, new_child)` pair for `state`.
    ///
    /// # Errors
    ///
    /// Returns [`CmstError::NeighborhoodExhausted`] when no feasible pair
    /// is found within the attempt cap.
    pub fn propose<R: Rng>(
        &self,
        state: &TreeState,
        instance: &ProblemInstance,
        rng: &mut R,
    ) -> Result<(usize, usize)> {
        let depot = state.depot();
        for _ in 0..self.max_attempts {
            let new_parent = rng.random_range(0..=depot);
            let new_child = rng.random_range(0..=depot);
            if is_feasible_move(state, instance, new_parent, new_child) {
                return Ok((new_parent, new_child));
            }
        }
        tracing::warn!(
            attempts = self.max_attempts,
            capacity = instance.capacity(),
            "neighbor generation exhausted its attempt cap"
        );
        Err(CmstError::NeighborhoodExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Writes a random neighbor of `current` into `candidate`.
    ///
    /// `candidate` is overwritten with a copy of `current` and then the
    /// drawn move is applied to it; `current` is left untouched.
    pub fn generate<R: Rng>(
        &self,
        current: &TreeState,
        candidate: &mut TreeState,
        instance: &ProblemInstance,
        rng: &mut R,
    ) -> Result<Move> {
        let (new_parent, node) = self.propose(current, instance, rng)?;
        candidate.clone_from(current);
        let old_parent = candidate.reparent(instance, node, new_parent);
        Ok(Move {
            node,
            old_parent,
            new_parent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn uniform_instance(n: usize, capacity: i64) -> ProblemInstance {
        let rows: Vec<Vec<i64>> = (0..=n)
            .map(|i| (0..=n).map(|j| if i == j { 0 } else { 5 }).collect())
            .collect();
        ProblemInstance::from_rows(capacity, &rows).unwrap()
    }

    fn feasible_moves(state: &TreeState, instance: &ProblemInstance) -> Vec<(usize, usize)> {
        let nodes = state.node_count();
        (0..nodes)
            .flat_map(|p| (0..nodes).map(move |c| (p, c)))
            .filter(|&(p, c)| is_feasible_move(state, instance, p, c))
            .collect()
    }

    #[test]
    fn test_rejects_self_noop_and_cycles() {
        let instance = uniform_instance(4, 4);
        let tree = TreeState::from_parents(&instance, &[4, 0, 1, 4]).unwrap();

        assert!(!is_feasible_move(&tree, &instance, 2, 2));
        assert!(!is_feasible_move(&tree, &instance, 1, 2));
        assert!(!is_feasible_move(&tree, &instance, 2, 0));
        assert!(!is_feasible_move(&tree, &instance, 0, 4));
        assert!(is_feasible_move(&tree, &instance, 0, 2));
        assert!(is_feasible_move(&tree, &instance, 4, 1));
    }

    #[test]
    fn test_capacity_on_cross_subtree_moves() {
        let instance = uniform_instance(4, 3);
        // Subtrees {0, 1} and {2, 3}.
        let tree = TreeState::from_parents(&instance, &[4, 0, 4, 2]).unwrap();

        // 2 + 1 fits, 2 + 2 does not.
        assert!(is_feasible_move(&tree, &instance, 0, 3));
        assert!(!is_feasible_move(&tree, &instance, 0, 2));
        assert!(!is_feasible_move(&tree, &instance, 1, 2));
        // Detaching to the depot only opens a new subtree.
        assert!(is_feasible_move(&tree, &instance, 4, 3));
    }

    #[test]
    fn test_internal_move_ignores_capacity() {
        let instance = uniform_instance(4, 3);
        // One full subtree 0 -> {1, 2}, and 3 alone.
        let tree = TreeState::from_parents(&instance, &[4, 0, 0, 4]).unwrap();
        assert!(is_feasible_move(&tree, &instance, 1, 2));
        assert!(!is_feasible_move(&tree, &instance, 1, 3));
    }

    #[test]
    fn test_single_client_has_no_moves() {
        let instance = uniform_instance(1, 5);
        let tree = TreeState::star(&instance);
        assert!(feasible_moves(&tree, &instance).is_empty());
        assert!(is_frozen(&instance));

        let generator = NeighborGenerator::new(500);
        let mut rng = create_rng(1);
        let err = generator.propose(&tree, &instance, &mut rng).unwrap_err();
        assert!(matches!(err, CmstError::NeighborhoodExhausted { attempts: 500 }));
    }

    #[test]
    fn test_unit_capacity_forbids_chaining() {
        let instance = uniform_instance(3, 1);
        let tree = TreeState::star(&instance);
        assert!(feasible_moves(&tree, &instance).is_empty());
        assert!(is_frozen(&instance));

        let generator = NeighborGenerator::new(10_000);
        let mut rng = create_rng(3);
        let mut candidate = tree.clone();
        assert!(generator
            .generate(&tree, &mut candidate, &instance, &mut rng)
            .is_err());
        assert_eq!(candidate, tree);
    }

    #[test]
    fn test_star_with_room_is_not_frozen() {
        let instance = uniform_instance(2, 2);
        let tree = TreeState::star(&instance);
        assert!(!is_frozen(&instance));
        assert_eq!(feasible_moves(&tree, &instance), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_generate_applies_one_move() {
        let instance = uniform_instance(6, 3);
        let current = TreeState::star(&instance);
        let mut candidate = current.clone();
        let generator = NeighborGenerator::default();
        let mut rng = create_rng(42);

        let mv = generator
            .generate(&current, &mut candidate, &instance, &mut rng)
            .unwrap();

        assert_eq!(mv.old_parent, 6);
        assert_ne!(mv.new_parent, 6);
        assert_eq!(candidate.parent(mv.node), Some(mv.new_parent));
        assert_eq!(current, TreeState::star(&instance));
        let changed = (0..6)
            .filter(|&v| candidate.parent(v) != current.parent(v))
            .count();
        assert_eq!(changed, 1);
        candidate.check_invariants(&instance).unwrap();
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let instance = uniform_instance(8, 4);
        let generator = NeighborGenerator::default();
        let walk = |seed: u64| {
            let mut rng = create_rng(seed);
            let mut current = TreeState::star(&instance);
            let mut candidate = current.clone();
            let mut moves = Vec::new();
            for _ in 0..50 {
                moves.push(
                    generator
                        .generate(&current, &mut candidate, &instance, &mut rng)
                        .unwrap(),
                );
                current.clone_from(&candidate);
            }
            moves
        };
        assert_eq!(walk(9), walk(9));
    }

    proptest! {
        #[test]
        fn prop_random_walk_stays_feasible(
            n in 2usize..12,
            capacity in 2i64..6,
            seed in any::<u64>(),
        ) {
            let instance = uniform_instance(n, capacity);
            let generator = NeighborGenerator::default();
            let mut rng = create_rng(seed);
            let mut current = TreeState::star(&instance);
            let mut candidate = current.clone();
            for _ in 0..100 {
                let mv = generator
                    .generate(&current, &mut candidate, &instance, &mut rng)
                    .unwrap();
                prop_assert_ne!(mv.old_parent, mv.new_parent);
                prop_assert!(candidate.check_invariants(&instance).is_ok());
                current.clone_from(&candidate);
            }
        }
    }
}
