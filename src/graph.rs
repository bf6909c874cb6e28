//! Weighted undirected graph container.
//!
//! Vertices are dense integer keys in `[0, span)`. Not every key has to name
//! a live vertex; iteration only visits live keys, while per-vertex side
//! tables (weights, memberships) are sized by the span. Community ids share
//! the vertex key space, so an aggregated graph can reuse the span of the
//! graph it condenses.
//!
//! Edges are stored as directed arcs. An undirected edge is a matching pair
//! of arcs ([`WeightedGraph::add_link`]); a self-loop is a single arc and
//! contributes its weight once.

use crate::error::{Error, Result};

/// Adjacency-list graph over dense vertex keys with weighted edges.
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    live: Vec<bool>,
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl WeightedGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with `span` reserved keys, none of them live yet.
    pub fn with_span(span: usize) -> Self {
        Self {
            live: vec![false; span],
            adjacency: vec![Vec::new(); span],
        }
    }

    /// Smallest integer greater than every vertex key.
    #[inline]
    pub fn span(&self) -> usize {
        self.live.len()
    }

    /// Number of live vertices.
    pub fn vertex_count(&self) -> usize {
        self.live.iter().filter(|&&alive| alive).count()
    }

    /// Number of stored arcs. Each undirected edge counts twice, a self-loop
    /// once.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Whether `u` is a live vertex.
    #[inline]
    pub fn has_vertex(&self, u: usize) -> bool {
        u < self.live.len() && self.live[u]
    }

    /// Mark `u` live, growing the span if needed.
    pub fn add_vertex(&mut self, u: usize) {
        self.grow(u + 1);
        self.live[u] = true;
    }

    /// Add a directed arc `u -> v`, making `u` live.
    ///
    /// The target is not implicitly added: an arc pointing outside the
    /// current span is a malformed state that [`validate`](Self::validate)
    /// reports rather than the graph silently widening to absorb it.
    pub fn add_edge(&mut self, u: usize, v: usize, weight: f64) {
        self.add_vertex(u);
        self.adjacency[u].push((v, weight));
    }

    /// Add an undirected edge: arcs in both directions, or a single arc for
    /// a self-loop. Both endpoints end up live.
    pub fn add_link(&mut self, u: usize, v: usize, weight: f64) {
        self.add_edge(u, v, weight);
        if u != v {
            self.add_edge(v, u, weight);
        }
    }

    /// Whether an arc `u -> v` exists.
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.edge_weight(u, v).is_some()
    }

    /// Weight of the arc `u -> v`, if present.
    pub fn edge_weight(&self, u: usize, v: usize) -> Option<f64> {
        if u >= self.span() {
            return None;
        }
        self.adjacency[u]
            .iter()
            .find(|&&(t, _)| t == v)
            .map(|&(_, w)| w)
    }

    /// Overwrite the weight of an existing arc `u -> v`. Returns whether the
    /// arc was found.
    pub fn set_edge_weight(&mut self, u: usize, v: usize, weight: f64) -> bool {
        if u >= self.span() {
            return false;
        }
        match self.adjacency[u].iter_mut().find(|&&mut (t, _)| t == v) {
            Some(slot) => {
                slot.1 = weight;
                true
            }
            None => false,
        }
    }

    /// Remove every arc `u -> v`.
    pub fn remove_edge(&mut self, u: usize, v: usize) {
        if u < self.span() {
            self.adjacency[u].retain(|&(t, _)| t != v);
        }
    }

    /// Remove an undirected edge (both arc directions).
    pub fn remove_link(&mut self, u: usize, v: usize) {
        self.remove_edge(u, v);
        if u != v {
            self.remove_edge(v, u);
        }
    }

    /// Out-degree of `u` (number of stored arcs, self-loop included).
    pub fn degree(&self, u: usize) -> usize {
        self.adjacency[u].len()
    }

    /// Iterate over live vertex keys in increasing order.
    pub fn vertex_keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.live
            .iter()
            .enumerate()
            .filter_map(|(u, &alive)| alive.then_some(u))
    }

    /// Iterate over the `(neighbor, weight)` arcs out of `u`.
    pub fn edges(&self, u: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.adjacency[u].iter().copied()
    }

    /// Iterate over the neighbor keys of `u`.
    pub fn neighbor_keys(&self, u: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[u].iter().map(|&(v, _)| v)
    }

    /// Check edge weights and endpoints.
    ///
    /// Surfaces negative weights and arcs pointing outside `[0, span)`; a
    /// well-formed graph never fails.
    pub fn validate(&self) -> Result<()> {
        let span = self.span();
        for u in self.vertex_keys() {
            for (v, w) in self.edges(u) {
                if w < 0.0 {
                    return Err(Error::NegativeEdgeWeight {
                        source: u,
                        target: v,
                        weight: w,
                    });
                }
                if v >= span {
                    return Err(Error::EdgeOutOfBounds {
                        source: u,
                        target: v,
                        span,
                    });
                }
            }
        }
        Ok(())
    }

    fn grow(&mut self, span: usize) {
        if span > self.live.len() {
            self.live.resize(span, false);
            self.adjacency.resize(span, Vec::new());
        }
    }
}
