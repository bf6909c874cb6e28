//! # commune
//!
//! Community detection for weighted undirected graphs via the Louvain
//! method, with incremental re-clustering for edge-batch updates.
//!
//! The solver greedily maximizes resolution-parameterized modularity by
//! alternating local vertex moves with community aggregation, and composes
//! the per-level memberships back onto the original vertices. When an
//! already-clustered graph is edited, delta-screening narrows the first
//! re-clustering pass to the vertices the edit batch can have affected.
//!
//! ```
//! use commune::{Louvain, WeightedGraph};
//!
//! // Two triangles joined by a weak bridge.
//! let mut graph = WeightedGraph::new();
//! for &(u, v) in &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)] {
//!     graph.add_link(u, v, 1.0);
//! }
//! graph.add_link(2, 3, 0.01);
//!
//! let result = Louvain::new().cluster(&graph).unwrap();
//! assert_eq!(result.membership[0], result.membership[2]);
//! assert_ne!(result.membership[2], result.membership[3]);
//! ```

pub mod error;
pub mod graph;
pub mod louvain;
pub mod modularity;
pub mod traits;

#[cfg(test)]
mod solver_tests;

pub use error::{Error, Result};
pub use graph::WeightedGraph;
pub use louvain::{EdgeBatch, Louvain, LouvainResult};
pub use modularity::modularity;
pub use traits::CommunityDetection;
