//! Canonical text serialization.
//!
//! Items are written in source order when they came from parsed text;
//! programmatically added items follow, nodes before edges. Nodes that exist
//! only as edge endpoints are left out, every other node gets one line, and
//! every edge is written as a single hop. Re-parsing the output rebuilds an
//! equivalent graph, and rendering that graph again gives the same text.

use std::borrow::Cow;

use crate::attrs::AttrList;
use crate::graph::{Edge, Graph, Node};

/// Whether `value` can be written without quotes and parse back unchanged.
///
/// Must agree with the grammar's `bare_value` rule.
pub fn is_bare_safe(value: &str) -> bool {
    !value.is_empty()
        && value.chars().all(|c| {
            !c.is_whitespace() && !matches!(c, ',' | ';' | '=' | '[' | ']' | '"' | '#' | '/')
        })
}

/// Quotes `value` unless it is bare-safe, escaping embedded `"`.
pub fn quote_value(value: &str) -> Cow<'_, str> {
    if is_bare_safe(value) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\\\"")))
    }
}

enum Item<'g> {
    Node(&'g Node),
    Edge(&'g Edge),
}

/// Renders the canonical text form of `graph`.
pub fn render(graph: &Graph) -> String {
    let mut out = String::new();
    for item in in_print_order(graph) {
        match item {
            Item::Node(node) => write_node(&mut out, node),
            Item::Edge(edge) => write_edge(&mut out, graph, edge),
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(lines = out.lines().count(), "rendered graph");

    out
}

fn in_print_order(graph: &Graph) -> Vec<Item<'_>> {
    let mut items: Vec<(Option<usize>, u8, Item<'_>)> = graph
        .nodes()
        .filter(|n| !is_implied(n))
        .map(|n| (n.decl_pos().map(|p| p.offset), 0, Item::Node(n)))
        .chain(
            graph
                .edges()
                .map(|e| (e.pos().map(|p| p.offset), 1, Item::Edge(e))),
        )
        .collect();

    // Positioned items by offset, then unpositioned nodes, then
    // unpositioned edges. Stable, so ties keep graph order.
    items.sort_by_key(|(offset, class, _)| match offset {
        Some(offset) => (0, *offset, 0),
        None => (1, 0, *class),
    });
    items.into_iter().map(|(_, _, item)| item).collect()
}

/// A node known only as an edge endpoint: never declared, with no type and
/// no attributes. Its edges already say everything about it.
fn is_implied(node: &Node) -> bool {
    node.decl_pos().is_none()
        && node.ty().is_empty()
        && node.attrs().is_empty()
        && (node.in_degree() > 0 || node.out_degree() > 0)
}

fn write_node(out: &mut String, node: &Node) {
    out.push_str(node.id());
    write_props(out, " [", node.ty(), node.attrs());
    out.push('\n');
}

fn write_edge(out: &mut String, graph: &Graph, edge: &Edge) {
    let endpoint = |n| graph.node(n).map(Node::id);
    let (Some(from), Some(to)) = (
        edge.from().and_then(endpoint),
        edge.to().and_then(endpoint),
    ) else {
        return;
    };

    out.push_str(from);
    out.push_str(" -");
    if write_props(out, "[", edge.ty(), edge.attrs()) {
        out.push('-');
    }
    out.push_str("> ");
    out.push_str(to);
    out.push('\n');
}

/// Writes `prefix` and a closed `type; k=v, ...]` block, or nothing when
/// there is neither a type nor attributes. Returns whether it wrote.
fn write_props(out: &mut String, prefix: &str, ty: &str, attrs: &AttrList) -> bool {
    if ty.is_empty() && attrs.is_empty() {
        return false;
    }
    out.push_str(prefix);
    if !ty.is_empty() {
        out.push_str(&quote_value(ty));
        if !attrs.is_empty() {
            out.push_str("; ");
        }
    }
    for (i, (key, value)) in attrs.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(key);
        out.push('=');
        out.push_str(&quote_value(value));
    }
    out.push(']');
    true
}
