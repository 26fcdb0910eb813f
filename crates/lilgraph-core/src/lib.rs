//! # lilgraph Core
//!
//! Validated in-memory graphs built from lilgraph text, with lexical
//! topological ranking and a canonical text form.

pub mod attrs;
pub mod build;
pub mod errors;
pub mod graph;
pub mod marshal;
pub mod topo;

use std::path::Path;

use lilgraph_frontend::SourcePosition;

// Re-export commonly used types
pub use attrs::AttrList;
pub use build::build;
pub use errors::{AttrOwner, CycleError, GraphError};
pub use graph::{is_valid_id, Edge, EdgeId, Graph, Node, NodeId};
pub use lilgraph_frontend::AstGraph;

/// Parses and builds a graph from raw bytes, which must be UTF-8.
pub fn parse(src: &[u8]) -> Result<Graph, GraphError> {
    parse_str(decode(src)?)
}

/// Parses and builds a graph from text.
pub fn parse_str(src: &str) -> Result<Graph, GraphError> {
    let ast = lilgraph_frontend::parse_graph(src)?;
    build(&ast)
}

/// Reads, parses and builds a graph from a file. Positions in errors name
/// the file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Graph, GraphError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path.display().to_string();
    let text = decode(&bytes).map_err(|err| match err {
        GraphError::ParseFailure { message, position } => GraphError::ParseFailure {
            message,
            position: position.map(|p| p.with_file(name.as_str().into())),
        },
        other => other,
    })?;

    #[cfg(feature = "tracing")]
    tracing::debug!(file = %name, bytes = bytes.len(), "parsing file");

    let ast = lilgraph_frontend::parse_graph_with_file(text, Some(&name))?;
    build(&ast)
}

fn decode(src: &[u8]) -> Result<&str, GraphError> {
    std::str::from_utf8(src).map_err(|err| {
        let valid = String::from_utf8_lossy(&src[..err.valid_up_to()]);
        let line = valid.matches('\n').count() + 1;
        let column = valid.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
        GraphError::ParseFailure {
            message: format!("input is not valid UTF-8: {err}"),
            position: Some(SourcePosition::new(
                line as u32,
                column as u32,
                err.valid_up_to(),
            )),
        }
    })
}
