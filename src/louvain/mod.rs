//! Louvain method for modularity-based community detection.
//!
//! Fast greedy modularity optimization through local vertex moves and graph
//! aggregation (Blondel et al. 2008):
//!
//! 1. **Local moving**: start from singleton communities and repeatedly
//!    move each vertex to the neighboring community with the highest
//!    modularity gain, until a sweep's summed gains drop to the tolerance.
//! 2. **Aggregation**: condense each community into a super-vertex whose
//!    self-loop carries the internal edge mass, then repeat on the smaller
//!    graph.
//!
//! Passes continue until a pass stops merging or its global modularity gain
//! falls below the pass tolerance; the per-level memberships are composed
//! back onto the leaf vertices.
//!
//! ## Gain evaluation
//!
//! Moving vertex `u` from community `d` to `c` changes modularity by
//!
//! ```text
//! ΔQ = (k_uc - k_ud)/M - γ·k_u·(k_u + tot(c) - tot(d)) / (2M²)
//! ```
//!
//! with `k_uc` the weight from `u` into `c` and `tot` the running community
//! weights, so evaluating a move costs O(degree) given the scan buffers.
//!
//! ## Incremental updates
//!
//! [`Louvain::cluster_dynamic`] re-clusters an edited graph starting from
//! its previous solution. Delta-screening derives the set of vertices whose
//! assignment the edit batch can have invalidated, and the first
//! local-moving pass is restricted to that set.
//!
//! ## References
//!
//! - Blondel, Guillaume, Lambiotte, Lefebvre (2008). "Fast unfolding of
//!   communities in large networks." J. Stat. Mech. P10008.
//! - Zarayeneh & Kalyanaraman (2021). "Delta-Screening: a fast and
//!   efficient technique to update communities in dynamic graphs."

mod aggregate;
mod local_move;
mod scan;
mod screening;
mod weights;

pub use screening::EdgeBatch;

use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::graph::WeightedGraph;
use crate::modularity::modularity;

use aggregate::aggregate;
use local_move::{local_move, local_move_restricted};
use scan::ScanScratch;
use screening::affected_vertices;
use weights::{community_weights, init_singletons, vertex_weights};

/// Louvain community detection over a [`WeightedGraph`].
///
/// ```
/// use commune::{Louvain, WeightedGraph};
///
/// let mut graph = WeightedGraph::new();
/// graph.add_link(0, 1, 1.0);
/// graph.add_link(1, 2, 1.0);
/// graph.add_link(0, 2, 1.0);
///
/// let result = Louvain::new().cluster(&graph).unwrap();
/// assert_eq!(result.membership[0], result.membership[2]);
/// ```
#[derive(Debug, Clone)]
pub struct Louvain {
    /// Resolution parameter (gamma).
    resolution: f64,
    /// Per-sweep summed-gain threshold for local-move convergence.
    tolerance: f64,
    /// Minimum global modularity gain between passes to continue.
    pass_tolerance: f64,
    /// Multiplier applied to the tolerance after each pass.
    tolerance_decline: f64,
    /// Maximum sweeps per local-moving phase.
    max_iter: usize,
    /// Maximum aggregation passes.
    max_passes: usize,
    /// Number of times to re-run the solve (for timing).
    repeat: usize,
}

/// Outcome of a solve.
#[derive(Debug, Clone)]
pub struct LouvainResult {
    /// Community id per vertex key. Ids live in the vertex key space: each
    /// community is named after one of its member vertices.
    pub membership: Vec<usize>,
    /// Local-moving sweeps performed, summed over all passes.
    pub iterations: usize,
    /// Passes completed.
    pub passes: usize,
    /// Wall time of one solve, averaged over the configured repeats.
    pub time: Duration,
}

impl Louvain {
    /// Create a solver with default settings.
    pub fn new() -> Self {
        Self {
            resolution: 1.0,
            tolerance: 0.0,
            pass_tolerance: 0.0,
            tolerance_decline: 1.0,
            max_iter: 500,
            max_passes: 500,
            repeat: 1,
        }
    }

    /// Set the resolution parameter.
    ///
    /// Larger values produce smaller communities.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the local-move convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the minimum between-pass modularity gain to keep going.
    pub fn with_pass_tolerance(mut self, pass_tolerance: f64) -> Self {
        self.pass_tolerance = pass_tolerance;
        self
    }

    /// Set the factor by which the tolerance shrinks after each pass.
    pub fn with_tolerance_decline(mut self, factor: f64) -> Self {
        self.tolerance_decline = factor;
        self
    }

    /// Set the maximum sweeps per local-moving phase.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the maximum number of passes.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Re-run the full solve this many times and report the average time.
    pub fn with_repeat(mut self, repeat: usize) -> Self {
        self.repeat = repeat;
        self
    }

    /// Cluster from singleton communities.
    pub fn cluster(&self, graph: &WeightedGraph) -> Result<LouvainResult> {
        self.validate_options()?;
        graph.validate()?;
        Ok(self.run(graph, None, None))
    }

    /// Cluster starting from a supplied membership instead of singletons.
    pub fn cluster_seeded(
        &self,
        graph: &WeightedGraph,
        initial: &[usize],
    ) -> Result<LouvainResult> {
        self.validate_options()?;
        graph.validate()?;
        validate_membership(graph, initial)?;
        Ok(self.run(graph, Some(initial), None))
    }

    /// Re-cluster after a batch of edge updates.
    ///
    /// `graph` must already reflect the batch; `previous` is the solution
    /// for the graph before the edit. Delta-screening restricts the first
    /// local-moving pass to the vertices the batch can have affected;
    /// later passes run unrestricted.
    pub fn cluster_dynamic(
        &self,
        graph: &WeightedGraph,
        previous: &[usize],
        batch: &EdgeBatch,
    ) -> Result<LouvainResult> {
        self.validate_options()?;
        graph.validate()?;
        validate_membership(graph, previous)?;
        batch.validate(graph.span())?;
        Ok(self.run(graph, Some(previous), Some(batch)))
    }

    /// Resolution parameter in use.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    fn validate_options(&self) -> Result<()> {
        if !(self.resolution > 0.0) {
            return Err(Error::InvalidParameter {
                name: "resolution",
                message: "must be positive",
            });
        }
        if !(self.tolerance_decline >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "tolerance_decline",
                message: "must be non-negative",
            });
        }
        Ok(())
    }

    fn run(
        &self,
        graph: &WeightedGraph,
        seed: Option<&[usize]>,
        batch: Option<&EdgeBatch>,
    ) -> LouvainResult {
        let runs = self.repeat.max(1);
        let started = Instant::now();
        let mut result = self.solve(graph, seed, batch);
        for _ in 1..runs {
            result = self.solve(graph, seed, batch);
        }
        result.time = started.elapsed() / runs as u32;
        result
    }

    fn solve(
        &self,
        graph: &WeightedGraph,
        seed: Option<&[usize]>,
        batch: Option<&EdgeBatch>,
    ) -> LouvainResult {
        let span = graph.span();
        let mut result = LouvainResult {
            membership: (0..span).collect(),
            iterations: 0,
            passes: 0,
            time: Duration::ZERO,
        };

        let mut vertex_weight = vertex_weights(graph);
        let mass: f64 = vertex_weight.iter().sum::<f64>() / 2.0;
        if mass <= 0.0 {
            // No edge weight: nothing to optimize, communities stay as given.
            if let Some(initial) = seed {
                result.membership.copy_from_slice(initial);
            }
            return result;
        }

        let (mut membership, mut community_weight) = match seed {
            Some(initial) => {
                let membership = initial.to_vec();
                let community_weight = community_weights(graph, &membership, &vertex_weight);
                (membership, community_weight)
            }
            None => init_singletons(graph, &vertex_weight),
        };

        // Affected mask for the first pass of a dynamic update.
        let mut restrict: Option<Vec<bool>> = batch.map(|batch| {
            affected_vertices(
                graph,
                batch,
                &membership,
                &vertex_weight,
                &community_weight,
                mass,
                self.resolution,
            )
        });

        let mut scratch = ScanScratch::new(span);
        let mut tolerance = self.tolerance;
        let mut previous_q = modularity(graph, &membership, self.resolution);
        let mut owned: Option<WeightedGraph> = None;

        loop {
            let level: &WeightedGraph = owned.as_ref().map_or(graph, |g| g);
            let live = level.vertex_count();
            if live <= 1 {
                break;
            }

            let sweeps = match restrict.take() {
                Some(mut affected) => local_move_restricted(
                    level,
                    &mut membership,
                    &mut community_weight,
                    &vertex_weight,
                    &mut scratch,
                    &mut affected,
                    mass,
                    self.resolution,
                    tolerance,
                    self.max_iter,
                ),
                None => local_move(
                    level,
                    &mut membership,
                    &mut community_weight,
                    &vertex_weight,
                    &mut scratch,
                    mass,
                    self.resolution,
                    tolerance,
                    self.max_iter,
                ),
            };
            result.iterations += sweeps;
            result.passes += 1;
            lift_membership(&mut result.membership, &membership);

            if count_communities(level, &membership) == live {
                break;
            }
            let q = modularity(level, &membership, self.resolution);
            if q - previous_q <= self.pass_tolerance {
                break;
            }
            previous_q = q;
            if result.passes >= self.max_passes {
                break;
            }

            let next = aggregate(level, &membership, &mut scratch);
            vertex_weight = vertex_weights(&next);
            debug_assert!(
                (vertex_weight.iter().sum::<f64>() / 2.0 - mass).abs() <= 1e-6 * mass.max(1.0)
            );
            let (next_membership, next_weight) = init_singletons(&next, &vertex_weight);
            membership = next_membership;
            community_weight = next_weight;
            tolerance *= self.tolerance_decline;
            owned = Some(next);
        }

        result
    }
}

impl Default for Louvain {
    fn default() -> Self {
        Self::new()
    }
}

/// Compose one aggregation level into the leaf membership, in place: every
/// entry is replaced by its community at the next level.
pub(crate) fn lift_membership(membership: &mut [usize], level: &[usize]) {
    for community in membership.iter_mut() {
        *community = level[*community];
    }
}

fn count_communities(graph: &WeightedGraph, membership: &[usize]) -> usize {
    let mut seen = vec![false; graph.span()];
    let mut count = 0;
    for u in graph.vertex_keys() {
        let c = membership[u];
        if !seen[c] {
            seen[c] = true;
            count += 1;
        }
    }
    count
}

fn validate_membership(graph: &WeightedGraph, membership: &[usize]) -> Result<()> {
    let span = graph.span();
    if membership.len() != span {
        return Err(Error::InvalidParameter {
            name: "membership",
            message: "length must equal the graph span",
        });
    }
    for u in graph.vertex_keys() {
        if membership[u] >= span {
            return Err(Error::InvalidMembership {
                vertex: u,
                community: membership[u],
                span,
            });
        }
    }
    Ok(())
}
