//! Parent-pointer tree with incrementally maintained subtree sizes.

use crate::error::{CmstError, Result};
use crate::instance::ProblemInstance;

const NO_PARENT: usize = usize::MAX;

/// A spanning tree rooted at the depot.
///
/// Holds, for every node `v`:
///
/// - `parent[v]`: the node `v` hangs from (the depot has none);
/// - `descendants[v]`: the number of proper descendants of `v`.
///
/// and the cached objective `Σ cost[v][parent[v]]` over all clients.
/// [`reparent`](Self::reparent) keeps all three consistent.
#[derive(Debug, PartialEq, Eq)]
pub struct TreeState {
    parent: Vec<usize>,
    descendants: Vec<usize>,
    objective: i64,
}

impl TreeState {
    /// The star tree: every client attached directly to the depot.
    ///
    /// Always feasible, since every top-level subtree has one node.
    pub fn star(instance: &ProblemInstance) -> Self {
        let depot = instance.depot();
        let mut parent = vec![depot; instance.node_count()];
        parent[depot] = NO_PARENT;
        let mut descendants = vec![0; instance.node_count()];
        descendants[depot] = instance.clients();
        let objective = (0..depot).map(|v| instance.cost(v, depot)).sum();

        Self {
            parent,
            descendants,
            objective,
        }
    }

    /// Builds a tree from the parent of each client.
    ///
    /// `parents[v]` is the parent of client `v`; it must have exactly
    /// `N` entries.
    ///
    /// # Errors
    ///
    /// Returns [`CmstError::InvariantViolation`] if the parents do not
    /// describe a tree rooted at the depot or if a top-level subtree
    /// exceeds the capacity.
    pub fn from_parents(instance: &ProblemInstance, parents: &[usize]) -> Result<Self> {
        let depot = instance.depot();
        if parents.len() != instance.clients() {
            return Err(CmstError::InvariantViolation(format!(
                "expected {} parents, got {}",
                instance.clients(),
                parents.len()
            )));
        }

        let mut parent = parents.to_vec();
        parent.push(NO_PARENT);
        let mut state = Self {
            parent,
            descendants: vec![0; instance.node_count()],
            objective: 0,
        };
        state.validate_parents()?;

        for v in 0..depot {
            let mut p = state.parent[v];
            while p != NO_PARENT {
                state.descendants[p] += 1;
                p = state.parent[p];
            }
        }
        state.objective = state.recompute_objective(instance);
        state.check_invariants(instance)?;
        Ok(state)
    }

    /// Cached total edge cost.
    #[inline]
    pub fn objective(&self) -> i64 {
        self.objective
    }

    /// Number of nodes including the depot.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.parent.len()
    }

    /// Id of the depot.
    #[inline]
    pub fn depot(&self) -> usize {
        self.parent.len() - 1
    }

    /// Parent of `node`, or `None` for the depot.
    #[inline]
    pub fn parent(&self, node: usize) -> Option<usize> {
        match self.parent[node] {
            NO_PARENT => None,
            p => Some(p),
        }
    }

    /// Number of proper descendants of `node`.
    #[inline]
    pub fn descendants(&self, node: usize) -> usize {
        self.descendants[node]
    }

    /// Whether `candidate` lies on the path from `descendant` up to the
    /// depot. A node is its own ancestor.
    pub fn is_ancestor(&self, candidate: usize, descendant: usize) -> bool {
        let mut node = descendant;
        for _ in 0..=self.parent.len() {
            if node == candidate {
                return true;
            }
            if node >= self.parent.len() {
                return false;
            }
            node = self.parent[node];
        }
        false
    }

    /// The depot child whose subtree contains `node`.
    ///
    /// Returns `None` for the depot and for ids outside the tree.
    pub fn subtree_root(&self, node: usize) -> Option<usize> {
        let depot = self.depot();
        if node >= depot {
            return None;
        }
        let mut node = node;
        for _ in 0..depot {
            let p = self.parent[node];
            if p == depot {
                return Some(node);
            }
            node = p;
        }
        None
    }

    /// Whether `a` and `b` hang from the same depot child.
    #[inline]
    pub fn same_top_subtree(&self, a: usize, b: usize) -> bool {
        self.subtree_root(a) == self.subtree_root(b)
    }

    /// Moves `node` (with its whole subtree) under `new_parent`.
    ///
    /// Descendant counts are updated along the old and the new ancestor
    /// chains and the objective is adjusted by the cost difference of the
    /// single replaced edge. Returns the previous parent.
    ///
    /// The caller must ensure `node` is a client, `node` is not an
    /// ancestor of `new_parent`, and the resulting tree respects the
    /// capacity bound.
    pub fn reparent(
        &mut self,
        instance: &ProblemInstance,
        node: usize,
        new_parent: usize,
    ) -> usize {
        debug_assert!(node < self.depot(), "the depot cannot be reparented");
        debug_assert!(
            !self.is_ancestor(node, new_parent),
            "reparenting {node} under {new_parent} would create a cycle"
        );

        let old_parent = self.parent[node];
        let moved = self.descendants[node] + 1;
        self.adjust_chain(old_parent, |count| count - moved);
        self.adjust_chain(new_parent, |count| count + moved);
        self.parent[node] = new_parent;
        self.objective += instance.cost(node, new_parent) - instance.cost(node, old_parent);
        old_parent
    }

    /// Applies `f` to the descendant counts from `start` up to, but not
    /// including, the depot, whose count never changes.
    fn adjust_chain(&mut self, start: usize, f: impl Fn(usize) -> usize) {
        let depot = self.depot();
        let mut node = start;
        while node != depot {
            self.descendants[node] = f(self.descendants[node]);
            node = self.parent[node];
        }
    }

    /// `(client, parent)` for every client, in id order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.parent[..self.depot()].iter().copied().enumerate()
    }

    /// `(root, size)` for every top-level subtree, size including the root.
    pub fn top_level_sizes(&self) -> Vec<(usize, usize)> {
        let depot = self.depot();
        (0..depot)
            .filter(|&v| self.parent[v] == depot)
            .map(|v| (v, self.descendants[v] + 1))
            .collect()
    }

    /// Sums the edge costs from scratch, ignoring the cached value.
    pub fn recompute_objective(&self, instance: &ProblemInstance) -> i64 {
        self.edges().map(|(v, p)| instance.cost(v, p)).sum()
    }

    /// Verifies every structural invariant of the tree against `instance`:
    /// acyclicity, exact descendant counts, the capacity of top-level
    /// subtrees, and the cached objective.
    pub fn check_invariants(&self, instance: &ProblemInstance) -> Result<()> {
        if self.node_count() != instance.node_count()
            || self.descendants.len() != instance.node_count()
        {
            return Err(CmstError::InvariantViolation(format!(
                "tree has {} nodes, instance has {}",
                self.node_count(),
                instance.node_count()
            )));
        }
        self.validate_parents()?;

        let depot = self.depot();
        let mut expected = vec![0usize; self.node_count()];
        for v in 0..depot {
            let mut p = self.parent[v];
            while p != NO_PARENT {
                expected[p] += 1;
                p = self.parent[p];
            }
        }
        if let Some(v) = (0..self.node_count()).find(|&v| expected[v] != self.descendants[v]) {
            return Err(CmstError::InvariantViolation(format!(
                "node {v} records {} descendants, has {}",
                self.descendants[v], expected[v]
            )));
        }

        for (root, size) in self.top_level_sizes() {
            if size > instance.capacity() {
                return Err(CmstError::InvariantViolation(format!(
                    "subtree rooted at {root} has {size} nodes, capacity is {}",
                    instance.capacity()
                )));
            }
        }

        let fresh = self.recompute_objective(instance);
        if fresh != self.objective {
            return Err(CmstError::InvariantViolation(format!(
                "cached objective {} differs from recomputed {fresh}",
                self.objective
            )));
        }
        Ok(())
    }

    /// Checks parent ids are in range and every client reaches the depot
    /// within `N` steps.
    fn validate_parents(&self) -> Result<()> {
        let depot = self.depot();
        if self.parent[depot] != NO_PARENT {
            return Err(CmstError::InvariantViolation(
                "the depot must not have a parent".into(),
            ));
        }
        for v in 0..depot {
            let p = self.parent[v];
            if p > depot || p == v {
                return Err(CmstError::InvariantViolation(format!(
                    "node {v} has invalid parent {p}"
                )));
            }
            let mut node = v;
            let mut steps = 0;
            while node != depot {
                if steps == depot {
                    return Err(CmstError::InvariantViolation(format!(
                        "node {v} is on a cycle"
                    )));
                }
                node = self.parent[node];
                steps += 1;
            }
        }
        Ok(())
    }
}

impl Clone for TreeState {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent.clone(),
            descendants: self.descendants.clone(),
            objective: self.objective,
        }
    }

    /// Copies `source` into `self`, reusing the existing buffers.
    fn clone_from(&mut self, source: &Self) {
        self.parent.clone_from(&source.parent);
        self.descendants.clone_from(&source.descendants);
        self.objective = source.objective;
    }
}
