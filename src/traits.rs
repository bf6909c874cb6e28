//! Community detection over petgraph graphs.
//!
//! The solver's native container is [`WeightedGraph`](crate::graph::WeightedGraph);
//! this trait is the convenience seam for callers holding a petgraph
//! [`UnGraph`]. Edges are taken at unit weight (edge payloads are opaque)
//! and the returned community ids are renumbered to consecutive integers.

use std::collections::HashMap;

use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;

use crate::error::Result;
use crate::graph::WeightedGraph;
use crate::louvain::Louvain;

/// Trait for community detection algorithms.
pub trait CommunityDetection {
    /// Detect communities in a graph.
    ///
    /// Returns a community id per node index, renumbered to consecutive
    /// integers starting at 0.
    fn detect<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>>;

    /// Get the resolution parameter (if applicable).
    fn resolution(&self) -> f64 {
        1.0
    }
}

impl CommunityDetection for Louvain {
    fn detect<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>> {
        let n = graph.node_count();
        let mut weighted = WeightedGraph::with_span(n);
        for u in 0..n {
            weighted.add_vertex(u);
        }
        for edge in graph.edge_references() {
            weighted.add_link(edge.source().index(), edge.target().index(), 1.0);
        }

        let result = self.cluster(&weighted)?;

        let mut ids: HashMap<usize, usize> = HashMap::new();
        let mut out = Vec::with_capacity(n);
        for u in 0..n {
            let next = ids.len();
            out.push(*ids.entry(result.membership[u]).or_insert(next));
        }
        Ok(out)
    }

    fn resolution(&self) -> f64 {
        Louvain::resolution(self)
    }
}
