//! Materializes a parsed AST into a [`Graph`].
//!
//! Items are applied in source order with upsert semantics, so a node may be
//! mentioned any number of times and its attributes accumulate. Failures
//! carry the position of the offending token.

use lilgraph_frontend::{AstGraph, AstItem, Attrs, EdgeChain, NodeDecl, SourcePosition};

use crate::errors::GraphError;
use crate::graph::{Graph, NodeId};

/// Builds a graph from an AST.
pub fn build(ast: &AstGraph) -> Result<Graph, GraphError> {
    let mut graph = Graph::new();
    for item in &ast.items {
        match item {
            AstItem::NodeDecl(decl) => add_decl(&mut graph, decl)?,
            AstItem::EdgeChain(chain) => add_chain(&mut graph, chain)?,
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        items = ast.items.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built graph"
    );

    Ok(graph)
}

fn add_decl(graph: &mut Graph, decl: &NodeDecl) -> Result<(), GraphError> {
    let ty = decl.ty.as_deref().unwrap_or("");
    let handle = upsert_node(graph, &decl.id, ty, Some(&decl.pos))?;
    if let Some(node) = graph.node_mut(handle) {
        apply_attrs(&decl.attrs, |k, v| node.set_attr(k, v))?;
    }
    Ok(())
}

fn add_chain(graph: &mut Graph, chain: &EdgeChain) -> Result<(), GraphError> {
    // Chain endpoints are references, not declarations: they get no
    // declaration position.
    let mut from = upsert_node(graph, &chain.from, "", None)?;
    for step in &chain.steps {
        let to = upsert_node(graph, &step.to, "", None)?;
        let ty = step.ty.as_deref().unwrap_or("");
        let (handle, existed) = graph
            .add_edge(from, to, ty)
            .map_err(|err| err.with_position(&step.arrow_pos))?;
        if let Some(edge) = graph.edge_mut(handle) {
            if !existed {
                edge.set_pos(&step.arrow_pos);
            }
            apply_attrs(&step.attrs, |k, v| edge.set_attr(k, v))?;
        }
        from = to;
    }
    Ok(())
}

fn upsert_node(
    graph: &mut Graph,
    id: &str,
    ty: &str,
    pos: Option<&SourcePosition>,
) -> Result<NodeId, GraphError> {
    let (handle, _) = graph.add_node(id, ty).map_err(|err| match pos {
        Some(pos) => err.with_position(pos),
        None => err,
    })?;
    if let (Some(pos), Some(node)) = (pos, graph.node_mut(handle)) {
        node.record_decl(pos, !ty.is_empty());
    }
    Ok(handle)
}

fn apply_attrs(
    attrs: &Attrs,
    mut set: impl FnMut(&str, &str) -> Result<(), GraphError>,
) -> Result<(), GraphError> {
    for entry in attrs {
        set(&entry.key, &entry.value).map_err(|err| err.with_position(&entry.key_pos))?;
    }
    Ok(())
}
