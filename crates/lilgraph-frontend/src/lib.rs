//! # lilgraph Frontend
//!
//! Grammar, AST and grammar actions for the lilgraph graph description
//! format.

pub mod actions;
pub mod ast;
pub mod errors;
pub mod parser;

// Re-export commonly used types
pub use ast::*;
pub use errors::{FrontendError, SourcePosition};
pub use parser::{normalize_source, parse_graph, parse_graph_with_file};
