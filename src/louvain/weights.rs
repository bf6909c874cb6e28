//! Vertex and community weight tables.
//!
//! These running totals are what make modularity-delta evaluation cost
//! O(degree): `vertex_weight[u]` is fixed for a level, and
//! `community_weight[c]` is co-mutated with every membership change.

use crate::graph::WeightedGraph;

/// Total edge weight of each vertex, self-loop included.
///
/// The sum over the returned table equals twice the undirected edge mass.
pub(crate) fn vertex_weights(graph: &WeightedGraph) -> Vec<f64> {
    let mut vertex_weight = vec![0.0; graph.span()];
    for u in graph.vertex_keys() {
        for (_, w) in graph.edges(u) {
            vertex_weight[u] += w;
        }
    }
    vertex_weight
}

/// Singleton clustering: every live vertex names its own community.
///
/// Dead keys map to themselves and carry zero community weight.
pub(crate) fn init_singletons(
    graph: &WeightedGraph,
    vertex_weight: &[f64],
) -> (Vec<usize>, Vec<f64>) {
    let membership: Vec<usize> = (0..graph.span()).collect();
    let mut community_weight = vec![0.0; graph.span()];
    for u in graph.vertex_keys() {
        community_weight[u] = vertex_weight[u];
    }
    (membership, community_weight)
}

/// Community totals for an externally supplied clustering, e.g. the previous
/// solution at the start of a dynamic update.
pub(crate) fn community_weights(
    graph: &WeightedGraph,
    membership: &[usize],
    vertex_weight: &[f64],
) -> Vec<f64> {
    let mut community_weight = vec![0.0; graph.span()];
    for u in graph.vertex_keys() {
        community_weight[membership[u]] += vertex_weight[u];
    }
    community_weight
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bridged_pair() -> WeightedGraph {
        let mut g = WeightedGraph::new();
        g.add_link(0, 1, 2.0);
        g.add_link(1, 2, 1.0);
        g.add_link(2, 2, 3.0);
        g
    }

    #[test]
    fn test_vertex_weights_include_self_loop_once() {
        let g = bridged_pair();
        let vw = vertex_weights(&g);
        assert_eq!(vw, vec![2.0, 3.0, 4.0]);
        // Directed sum is twice the undirected mass (self-loop counted half).
        let mass: f64 = vw.iter().sum();
        assert_eq!(mass, 9.0);
    }

    #[test]
    fn test_singletons_mirror_vertex_weights() {
        let g = bridged_pair();
        let vw = vertex_weights(&g);
        let (membership, community_weight) = init_singletons(&g, &vw);
        assert_eq!(membership, vec![0, 1, 2]);
        assert_eq!(community_weight, vw);
    }

    #[test]
    fn test_community_weights_for_given_clustering() {
        let g = bridged_pair();
        let membership = [1, 1, 2];
        let vw = vertex_weights(&g);
        let cw = community_weights(&g, &membership, &vw);
        assert_eq!(cw, vec![0.0, 5.0, 4.0]);
        // Totals agree with the per-vertex table.
        assert_eq!(cw.iter().sum::<f64>(), vw.iter().sum::<f64>());
        // Every community holds at least its members' weight.
        for u in g.vertex_keys() {
            assert!(cw[membership[u]] >= vw[u]);
        }
    }

    #[test]
    fn test_dead_keys_stay_zero() {
        let mut g = WeightedGraph::with_span(5);
        g.add_vertex(1);
        g.add_vertex(3);
        g.add_link(1, 3, 1.5);
        let vw = vertex_weights(&g);
        assert_eq!(vw, vec![0.0, 1.5, 0.0, 1.5, 0.0]);
        let (membership, cw) = init_singletons(&g, &vw);
        assert_eq!(membership, vec![0, 1, 2, 3, 4]);
        assert_eq!(cw[0], 0.0);
        assert_eq!(cw[2], 0.0);
        assert_eq!(cw[4], 0.0);
    }
}
