//! Community aggregation phase.
//!
//! Condenses a clustering into the next-level graph: one super-vertex per
//! non-empty community, edge weights summed over all member edges, and the
//! within-community mass carried as the super-vertex's self-loop so vertex
//! weights at the next level keep counting internal edges.
//!
//! Total edge mass is preserved: every original arc lands on exactly one
//! community pair, so the summed vertex weights of the condensed graph equal
//! those of the input.

use crate::graph::WeightedGraph;

use super::scan::ScanScratch;

/// Invert the clustering into a community -> members index.
pub(crate) fn community_members(graph: &WeightedGraph, membership: &[usize]) -> Vec<Vec<usize>> {
    let mut members = vec![Vec::new(); graph.span()];
    for u in graph.vertex_keys() {
        members[membership[u]].push(u);
    }
    members
}

/// Condense `graph` under `membership`.
///
/// Super-vertices keep their community ids, so the condensed graph lives in
/// the same key space (its span never exceeds the input's) and dense side
/// tables carry over between levels. Each cross-community pair is emitted
/// from both endpoints with equal weight, preserving the undirected-arc
/// pairing of the input.
pub(crate) fn aggregate(
    graph: &WeightedGraph,
    membership: &[usize],
    scratch: &mut ScanScratch,
) -> WeightedGraph {
    let members = community_members(graph, membership);
    let mut condensed = WeightedGraph::with_span(graph.span());
    for (c, vertices) in members.iter().enumerate() {
        if vertices.is_empty() {
            continue;
        }
        scratch.clear();
        for &u in vertices {
            scratch.scan(graph, u, membership, true);
        }
        condensed.add_vertex(c);
        for (d, w) in scratch.entries() {
            condensed.add_edge(c, d, w);
        }
    }
    scratch.clear();
    condensed
}

/// Aggregation by repeated edge lookup instead of scan buffers.
///
/// Walks every arc and folds its weight into the condensed graph with
/// `edge_weight`/`set_edge_weight`. Quadratic in community degree, kept as
/// a cross-check for the scan-buffer variant.
pub(crate) fn aggregate_by_lookup(graph: &WeightedGraph, membership: &[usize]) -> WeightedGraph {
    let mut condensed = WeightedGraph::with_span(graph.span());
    for u in graph.vertex_keys() {
        condensed.add_vertex(membership[u]);
    }
    for u in graph.vertex_keys() {
        let c = membership[u];
        for (v, w) in graph.edges(u) {
            let d = membership[v];
            match condensed.edge_weight(c, d) {
                Some(existing) => {
                    condensed.set_edge_weight(c, d, existing + w);
                }
                None => condensed.add_edge(c, d, w),
            }
        }
    }
    condensed
}
