//! Local-moving phase.
//!
//! The iterated sweep that reassigns each vertex to the adjacent community
//! with the highest modularity gain. Moves take effect immediately, so
//! later vertices in the same sweep see earlier vertices' new communities;
//! this asynchronous update order is part of the algorithm and converges
//! faster than a double-buffered variant would.

use crate::graph::WeightedGraph;
use crate::modularity::delta_modularity;

use super::scan::ScanScratch;

/// Pick the adjacent community with the best strictly positive modularity
/// gain for `u`, given a completed scan. Ties keep the first candidate
/// encountered. `None` means no move improves on staying put.
pub(crate) fn best_community(
    u: usize,
    membership: &[usize],
    vertex_weight: &[f64],
    community_weight: &[f64],
    scratch: &ScanScratch,
    total_weight: f64,
    resolution: f64,
) -> Option<(usize, f64)> {
    let current = membership[u];
    let mut best: Option<(usize, f64)> = None;
    for &c in scratch.communities() {
        if c == current {
            continue;
        }
        let gain = delta_modularity(
            scratch.weight_to(c),
            scratch.weight_to(current),
            vertex_weight[u],
            community_weight[c],
            community_weight[current],
            total_weight,
            resolution,
        );
        if gain > best.map_or(0.0, |(_, g)| g) {
            best = Some((c, gain));
        }
    }
    best
}

/// Move `u` into `target`, keeping community totals in step with the
/// membership.
pub(crate) fn apply_move(
    u: usize,
    target: usize,
    membership: &mut [usize],
    community_weight: &mut [f64],
    vertex_weight: &[f64],
) {
    let current = membership[u];
    debug_assert!(community_weight[current] >= vertex_weight[u] - 1e-9);
    community_weight[current] -= vertex_weight[u];
    community_weight[target] += vertex_weight[u];
    membership[u] = target;
}

/// One local-moving phase: sweep every live vertex in key order, moving each
/// to its best adjacent community, until a sweep's summed best gains fall to
/// `tolerance` or `max_iter` sweeps have run.
///
/// Returns the number of completed sweeps.
pub(crate) fn local_move(
    graph: &WeightedGraph,
    membership: &mut [usize],
    community_weight: &mut [f64],
    vertex_weight: &[f64],
    scratch: &mut ScanScratch,
    total_weight: f64,
    resolution: f64,
    tolerance: f64,
    max_iter: usize,
) -> usize {
    if total_weight <= 0.0 {
        return 0;
    }
    let mut sweeps = 0;
    while sweeps < max_iter {
        let mut gained = 0.0;
        for u in graph.vertex_keys() {
            scratch.clear();
            scratch.scan(graph, u, membership, false);
            if let Some((target, gain)) = best_community(
                u,
                membership,
                vertex_weight,
                community_weight,
                scratch,
                total_weight,
                resolution,
            ) {
                apply_move(u, target, membership, community_weight, vertex_weight);
                gained += gain;
            }
        }
        sweeps += 1;
        if gained <= tolerance {
            break;
        }
    }
    sweeps
}

/// Local moving restricted to an affected-vertex mask.
///
/// Used for the first pass of a dynamic update: only vertices flagged by
/// delta-screening are visited. A vertex that moves re-flags its neighbors
/// so the frontier can grow beyond the screened set; a vertex that settles
/// clears its own flag.
pub(crate) fn local_move_restricted(
    graph: &WeightedGraph,
    membership: &mut [usize],
    community_weight: &mut [f64],
    vertex_weight: &[f64],
    scratch: &mut ScanScratch,
    affected: &mut [bool],
    total_weight: f64,
    resolution: f64,
    tolerance: f64,
    max_iter: usize,
) -> usize {
    if total_weight <= 0.0 {
        return 0;
    }
    let mut sweeps = 0;
    while sweeps < max_iter {
        let mut gained = 0.0;
        for u in graph.vertex_keys() {
            if !affected[u] {
                continue;
            }
            scratch.clear();
            scratch.scan(graph, u, membership, false);
            match best_community(
                u,
                membership,
                vertex_weight,
                community_weight,
                scratch,
                total_weight,
                resolution,
            ) {
                Some((target, gain)) => {
                    apply_move(u, target, membership, community_weight, vertex_weight);
                    gained += gain;
                    for v in graph.neighbor_keys(u) {
                        affected[v] = true;
                    }
                }
                None => affected[u] = false,
            }
        }
        sweeps += 1;
        if gained <= tolerance {
            break;
        }
    }
    sweeps
}
