//! Error types for graph construction, mutation and ranking.

use std::fmt;
use std::path::PathBuf;

use lilgraph_frontend::{FrontendError, SourcePosition};
use thiserror::Error;

use crate::graph::NodeId;

impl From<FrontendError> for GraphError {
    fn from(err: FrontendError) -> Self {
        match err {
            FrontendError::Syntax { message, position } => GraphError::ParseFailure {
                message,
                position: Some(position),
            },
            other => GraphError::UnexpectedParserProduct(other.to_string()),
        }
    }
}

/// Which kind of graph item an attribute was being set on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOwner {
    Node,
    Edge,
}

impl fmt::Display for AttrOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Edge => f.write_str("edge"),
        }
    }
}

/// Why topological ranking gave up.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    /// Every node has an incoming edge.
    #[error("failed to find a node without incoming edges")]
    NoApex,

    /// A node came up again on the active depth-first path.
    #[error("node '{node}' already seen in depth-first walk from '{apex}'")]
    Revisited { node: String, apex: String },

    /// A node no apex can reach; it sits on or behind a cycle.
    #[error("node '{node}' is not reachable from any node without incoming edges")]
    Unreachable { node: String },
}

/// Errors that can occur while building, mutating or ranking a graph.
///
/// Every variant carries the ids involved, and a source position whenever
/// the failing fact came from parsed text.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GraphError {
    /// A node id does not match `[A-Za-z_][A-Za-z0-9_]*`.
    #[error("invalid node id '{id}'")]
    InvalidId { id: String },

    /// The source text is not valid lilgraph.
    #[error("failed parsing{}: {message}", located(.position))]
    ParseFailure {
        message: String,
        position: Option<SourcePosition>,
    },

    /// The grammar handed its actions something they did not expect. Always
    /// a defect in this crate, never caused by input.
    #[error("unexpected parser result type: {0}")]
    UnexpectedParserProduct(String),

    /// An edge would connect a node to itself.
    #[error("cannot create edge from a node to itself: edge{} forms a loop from '{node}' to itself", located(.position))]
    SelfLoop {
        node: String,
        position: Option<SourcePosition>,
    },

    /// A node already bound to one type was declared with another.
    #[error(
        "nodes cannot be redefined with a different type: node '{node}' already has type '{existing}'{}, attempted re-declaration to '{attempted}'{}",
        provenance_note(.provenance),
        located(.position)
    )]
    TypeConflict {
        node: String,
        existing: String,
        attempted: String,
        /// Where the existing type was first declared
        provenance: Option<SourcePosition>,
        /// Where the conflicting declaration sits
        position: Option<SourcePosition>,
    },

    /// An attribute named `type` (any case).
    #[error("attributes called '{key}' aren't allowed to avoid ambiguity{}; consider using {owner} type decl", located(.position))]
    ReservedAttributeKey {
        key: String,
        owner: AttrOwner,
        position: Option<SourcePosition>,
    },

    /// Topological ranking found a cycle.
    #[error("graph is cyclic: {0}")]
    CyclicGraph(#[from] CycleError),

    /// A handle that does not name a live node of this graph.
    #[error("node handle {0:?} does not refer to a live node")]
    UnknownNode(NodeId),

    /// Reading a source file failed.
    #[error("failed reading '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GraphError {
    /// Attaches `pos` to errors that carry a position but do not have one yet.
    pub fn with_position(mut self, pos: &SourcePosition) -> Self {
        match &mut self {
            Self::ParseFailure { position, .. }
            | Self::SelfLoop { position, .. }
            | Self::TypeConflict { position, .. }
            | Self::ReservedAttributeKey { position, .. } => {
                if position.is_none() {
                    *position = Some(pos.clone());
                }
            }
            _ => {}
        }
        self
    }

    /// Source position of the offending input, when known.
    pub fn position(&self) -> Option<&SourcePosition> {
        match self {
            Self::ParseFailure { position, .. }
            | Self::SelfLoop { position, .. }
            | Self::TypeConflict { position, .. }
            | Self::ReservedAttributeKey { position, .. } => position.as_ref(),
            _ => None,
        }
    }
}

fn located(pos: &Option<SourcePosition>) -> String {
    pos.as_ref().map(|p| format!(" at {p}")).unwrap_or_default()
}

fn provenance_note(pos: &Option<SourcePosition>) -> String {
    pos.as_ref()
        .map(|p| format!(" (declared at {p})"))
        .unwrap_or_default()
}
