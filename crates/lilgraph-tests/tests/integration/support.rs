use std::fs;
use std::path::PathBuf;

use lilgraph_core::{Graph, Node};

/// Path of a file under the crate's `fixtures/` directory.
pub fn fixture_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("fixtures");
    p.push(name);
    p
}

pub fn fixture(name: &str) -> String {
    let p = fixture_path(name);
    fs::read_to_string(&p).unwrap_or_else(|e| panic!("failed to read {}: {}", p.display(), e))
}

/// Node ids in graph order.
pub fn node_ids(graph: &Graph) -> Vec<String> {
    graph.nodes().map(|n| n.id().to_string()).collect()
}

/// Edges as `from->to:type` strings, in graph order.
pub fn edge_keys(graph: &Graph) -> Vec<String> {
    graph
        .edges()
        .map(|e| {
            let end = |n| graph.node(n).map(Node::id).unwrap_or("?");
            format!(
                "{}->{}:{}",
                e.from().map_or("?", end),
                e.to().map_or("?", end),
                e.ty()
            )
        })
        .collect()
}
