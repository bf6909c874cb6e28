//! Modularity scoring.
//!
//! Modularity compares the edge weight inside communities to the weight a
//! random graph with the same weighted degrees would place there:
//!
//! ```text
//! Q = Σ_c [ in(c)/(2M) - γ·(tot(c)/(2M))² ]
//! ```
//!
//! where `in(c)` is the directed-sum weight internal to community `c` (each
//! undirected internal edge counted from both endpoints, a self-loop once),
//! `tot(c)` is the summed weighted degree of its members, `M` is half the
//! total directed edge weight, and `γ` is the resolution parameter.
//!
//! The self-loop convention matters: a self-loop's weight appears once in
//! its vertex's weighted degree and contributes `w/2` to `M`. The closed
//! form in [`delta_modularity`] assumes the same convention; mixing
//! conventions flips ΔQ signs.
//!
//! ## References
//!
//! Newman & Girvan (2004). "Finding and evaluating community structure in
//! networks." Physical Review E 69, 026113.

use crate::graph::WeightedGraph;

/// Modularity `Q` of a clustering, in `[-1/2, 1)`.
///
/// `membership[u]` names the community of vertex `u`; community ids must lie
/// in `[0, span)`. Returns 0 for a graph with no edge weight.
pub fn modularity(graph: &WeightedGraph, membership: &[usize], resolution: f64) -> f64 {
    let span = graph.span();
    let mut internal = vec![0.0; span];
    let mut total = vec![0.0; span];
    let mut mass = 0.0;
    for u in graph.vertex_keys() {
        let c = membership[u];
        for (v, w) in graph.edges(u) {
            if membership[v] == c {
                internal[c] += w;
            }
            total[c] += w;
            mass += w;
        }
    }
    if mass <= 0.0 {
        return 0.0;
    }
    (0..span)
        .map(|c| internal[c] / mass - resolution * (total[c] / mass).powi(2))
        .sum()
}

/// Modularity change for moving a vertex out of community `d` into `c`.
///
/// `weight_to_c` and `weight_to_d` are the vertex's edge weights into each
/// community (own self-loop excluded), `vertex_weight` its weighted degree,
/// and `total_c`/`total_d` the community weights as currently stored (the
/// vertex still counted in `d`). `total_weight` is `M`.
///
/// Summing the returned value over any sequence of applied moves equals the
/// change in [`modularity`].
#[inline]
pub fn delta_modularity(
    weight_to_c: f64,
    weight_to_d: f64,
    vertex_weight: f64,
    total_c: f64,
    total_d: f64,
    total_weight: f64,
    resolution: f64,
) -> f64 {
    (weight_to_c - weight_to_d) / total_weight
        - resolution * vertex_weight * (vertex_weight + total_c - total_d)
            / (2.0 * total_weight * total_weight)
}
