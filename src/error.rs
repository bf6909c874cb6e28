use core::fmt;

/// Result alias for `commune`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the solver and the graph container.
///
/// The solver itself is total on well-formed input: these cover malformed
/// graphs, malformed update batches, and out-of-domain options. Hitting an
/// iteration or pass cap is not an error; it is reported through the result
/// counters.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// An edge carries a negative weight.
    NegativeEdgeWeight {
        /// Source vertex key.
        source: usize,
        /// Target vertex key.
        target: usize,
        /// Offending weight.
        weight: f64,
    },
    /// An edge endpoint lies outside `[0, span)`.
    EdgeOutOfBounds {
        /// Source vertex key.
        source: usize,
        /// Target vertex key.
        target: usize,
        /// Span of the graph.
        span: usize,
    },
    /// A supplied clustering names a community outside `[0, span)`.
    InvalidMembership {
        /// Vertex with the bad assignment.
        vertex: usize,
        /// Community id found.
        community: usize,
        /// Span of the graph.
        span: usize,
    },
    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NegativeEdgeWeight { source, target, weight } => {
                write!(f, "edge ({source}, {target}) has negative weight {weight}")
            }
            Error::EdgeOutOfBounds { source, target, span } => {
                write!(f, "edge ({source}, {target}) exceeds graph span {span}")
            }
            Error::InvalidMembership { vertex, community, span } => {
                write!(
                    f,
                    "vertex {vertex} assigned to community {community} outside span {span}"
                )
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
        }
    }
}

impl std::error::Error for Error {}
