//! Unconstrained minimum spanning tree.
//!
//! Dropping the capacity bound can only lower the optimum, so the MST
//! cost is a lower bound for every CMST of the same instance, and equals
//! the CMST optimum once `C >= N`.

use crate::instance::ProblemInstance;

/// Parent of every client in a minimum spanning tree rooted at the
/// depot, ignoring capacity.
///
/// Dense Prim's algorithm, O(N^2).
pub fn minimum_spanning_tree(instance: &ProblemInstance) -> Vec<usize> {
    let nodes = instance.node_count();
    let depot = instance.depot();
    let mut in_tree = vec![false; nodes];
    let mut best_edge: Vec<i64> = (0..nodes).map(|v| instance.cost(v, depot)).collect();
    let mut parent = vec![depot; nodes];
    in_tree[depot] = true;

    for _ in 0..instance.clients() {
        let next = (0..nodes)
            .filter(|&v| !in_tree[v])
            .min_by_key(|&v| best_edge[v]);
        let Some(next) = next else { break };
        in_tree[next] = true;

        for v in 0..nodes {
            if !in_tree[v] && instance.cost(v, next) < best_edge[v] {
                best_edge[v] = instance.cost(v, next);
                parent[v] = next;
            }
        }
    }

    parent.truncate(instance.clients());
    parent
}

/// Total cost of [`minimum_spanning_tree`].
pub fn minimum_spanning_tree_cost(instance: &ProblemInstance) -> i64 {
    minimum_spanning_tree(instance)
        .iter()
        .enumerate()
        .map(|(v, &p)| instance.cost(v, p))
        .sum()
}
