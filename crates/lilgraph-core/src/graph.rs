//! # Graph Model
//!
//! A directed, typed, attributed graph with unique node ids and at most one
//! edge per `(from, to, type)` triple.
//!
//! ## Design
//!
//! Nodes and edges live in arenas and are addressed by copyable handles
//! ([`NodeId`], [`EdgeId`]). Each record keeps its own handle, so iterating
//! [`Graph::nodes`] yields everything needed to mutate or connect a node.
//!
//! - Identity indices (`id -> NodeId`, `(from, to, type) -> EdgeId`) use
//!   `FxHashMap` for O(1) lookups
//! - Incident edge lists are `SmallVec`s; most nodes have a handful of edges
//! - Deleting removes an item from every live index but leaves its record in
//!   the arena. Handles held by callers stay safe to use: they simply stop
//!   resolving through the graph's lookups.
//!
//! ## Example
//!
//! ```rust
//! use lilgraph_core::Graph;
//!
//! let mut graph = Graph::new();
//! let (a, _) = graph.add_node("A", "svc").unwrap();
//! let (b, _) = graph.add_node("B", "").unwrap();
//! graph.add_edge(a, b, "calls").unwrap();
//! assert_eq!(graph.to_string(), "A [svc]\nA -[calls]-> B\n");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use lilgraph_frontend::SourcePosition;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::attrs::AttrList;
use crate::errors::{AttrOwner, GraphError};
use crate::{marshal, topo};

/// Handle of a node within one [`Graph`].
///
/// Ordered by creation, which makes handle-keyed collections iterate
/// deterministically.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub u32);

/// Handle of an edge within one [`Graph`].
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct EdgeId(pub u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Whether `id` is a legal node id: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A node record.
#[derive(Debug, Clone)]
pub struct Node {
    handle: NodeId,
    id: String,
    ty: Option<String>,
    attrs: AttrList,
    edges_from: SmallVec<[EdgeId; 4]>,
    edges_to: SmallVec<[EdgeId; 4]>,
    decl_pos: Option<SourcePosition>,
    type_pos: Option<SourcePosition>,
}

impl Node {
    fn new(handle: NodeId, id: &str, ty: &str) -> Self {
        Self {
            handle,
            id: id.to_string(),
            ty: non_empty(ty),
            attrs: AttrList::new(),
            edges_from: SmallVec::new(),
            edges_to: SmallVec::new(),
            decl_pos: None,
            type_pos: None,
        }
    }

    pub fn handle(&self) -> NodeId {
        self.handle
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The node type; `""` when untyped.
    pub fn ty(&self) -> &str {
        self.ty.as_deref().unwrap_or("")
    }

    pub fn attrs(&self) -> &AttrList {
        &self.attrs
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key)
    }

    /// Sets or updates an attribute. Fails for the reserved `type` key.
    pub fn set_attr(&mut self, key: &str, value: &str) -> Result<(), GraphError> {
        self.attrs.set(AttrOwner::Node, key, value)
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        self.attrs.remove(key)
    }

    pub fn attrs_map(&self) -> BTreeMap<String, String> {
        self.attrs.to_map()
    }

    /// Replaces all attributes; see [`AttrList`] for ordering.
    pub fn replace_attrs<K, V>(
        &mut self,
        attrs: impl IntoIterator<Item = (K, V)>,
    ) -> Result<(), GraphError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attrs.replace(AttrOwner::Node, attrs)
    }

    /// Outgoing edges, in creation order.
    pub fn edges_from(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges_from.iter().copied()
    }

    /// Incoming edges, in creation order.
    pub fn edges_to(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges_to.iter().copied()
    }

    pub fn in_degree(&self) -> usize {
        self.edges_to.len()
    }

    pub fn out_degree(&self) -> usize {
        self.edges_from.len()
    }

    /// Where the node was first declared in parsed text.
    pub fn decl_pos(&self) -> Option<&SourcePosition> {
        self.decl_pos.as_ref()
    }

    /// Where the node's type was first declared in parsed text.
    pub fn type_pos(&self) -> Option<&SourcePosition> {
        self.type_pos.as_ref()
    }

    /// Records a parsed occurrence. First occurrence wins for each position.
    pub(crate) fn record_decl(&mut self, pos: &SourcePosition, typed: bool) {
        if self.decl_pos.is_none() {
            self.decl_pos = Some(pos.clone());
        }
        if typed && self.type_pos.is_none() {
            self.type_pos = Some(pos.clone());
        }
    }
}

/// An edge record.
#[derive(Debug, Clone)]
pub struct Edge {
    handle: EdgeId,
    from: Option<NodeId>,
    to: Option<NodeId>,
    ty: Option<String>,
    attrs: AttrList,
    pos: Option<SourcePosition>,
}

impl Edge {
    pub fn handle(&self) -> EdgeId {
        self.handle
    }

    /// Source node; `None` once that node has been deleted.
    pub fn from(&self) -> Option<NodeId> {
        self.from
    }

    /// Target node; `None` once that node has been deleted.
    pub fn to(&self) -> Option<NodeId> {
        self.to
    }

    /// The edge type; `""` when untyped.
    pub fn ty(&self) -> &str {
        self.ty.as_deref().unwrap_or("")
    }

    pub fn attrs(&self) -> &AttrList {
        &self.attrs
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key)
    }

    /// Sets or updates an attribute. Fails for the reserved `type` key.
    pub fn set_attr(&mut self, key: &str, value: &str) -> Result<(), GraphError> {
        self.attrs.set(AttrOwner::Edge, key, value)
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        self.attrs.remove(key)
    }

    pub fn attrs_map(&self) -> BTreeMap<String, String> {
        self.attrs.to_map()
    }

    /// Replaces all attributes; see [`AttrList`] for ordering.
    pub fn replace_attrs<K, V>(
        &mut self,
        attrs: impl IntoIterator<Item = (K, V)>,
    ) -> Result<(), GraphError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attrs.replace(AttrOwner::Edge, attrs)
    }

    /// Position of the arrow that first created this edge in parsed text.
    pub fn pos(&self) -> Option<&SourcePosition> {
        self.pos.as_ref()
    }

    pub(crate) fn set_pos(&mut self, pos: &SourcePosition) {
        self.pos = Some(pos.clone());
    }
}

/// `(from, to, type)` with `""` standing for untyped.
type EdgeKey = (NodeId, NodeId, Box<str>);

/// A lilgraph graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    node_slots: Vec<Node>,
    edge_slots: Vec<Edge>,
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
    nodes_by_id: FxHashMap<String, NodeId>,
    edges_by_id: FxHashMap<EdgeKey, EdgeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates node `id`, or returns the existing one.
    ///
    /// `ty == ""` means "no type" and never changes an existing node. An
    /// untyped node adopts the first type it is given; a typed node only
    /// accepts its own type again. The boolean is `true` when the node
    /// already existed.
    pub fn add_node(&mut self, id: &str, ty: &str) -> Result<(NodeId, bool), GraphError> {
        if !is_valid_id(id) {
            return Err(GraphError::InvalidId { id: id.to_string() });
        }

        if let Some(&handle) = self.nodes_by_id.get(id) {
            let node = &mut self.node_slots[handle.index()];
            if ty.is_empty() {
                return Ok((handle, true));
            }
            if let Some(existing) = node.ty.as_deref().filter(|t| *t != ty) {
                return Err(GraphError::TypeConflict {
                    node: id.to_string(),
                    existing: existing.to_string(),
                    attempted: ty.to_string(),
                    provenance: node.type_pos.clone(),
                    position: None,
                });
            }
            if node.ty.is_none() {
                node.ty = Some(ty.to_string());
            }
            return Ok((handle, true));
        }

        let handle = NodeId(self.node_slots.len() as u32);
        self.node_slots.push(Node::new(handle, id, ty));
        self.nodes.push(handle);
        self.nodes_by_id.insert(id.to_string(), handle);
        Ok((handle, false))
    }

    /// Creates the `(from, to, ty)` edge, or returns the existing one.
    ///
    /// Edges with different types between the same endpoints are distinct.
    /// The boolean is `true` when the edge already existed.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        ty: &str,
    ) -> Result<(EdgeId, bool), GraphError> {
        for handle in [from, to] {
            if !self.contains_node(handle) {
                return Err(GraphError::UnknownNode(handle));
            }
        }
        if from == to {
            return Err(GraphError::SelfLoop {
                node: self.node_slots[from.index()].id.clone(),
                position: None,
            });
        }

        let key: EdgeKey = (from, to, Box::from(ty));
        if let Some(&handle) = self.edges_by_id.get(&key) {
            return Ok((handle, true));
        }

        let handle = EdgeId(self.edge_slots.len() as u32);
        self.edge_slots.push(Edge {
            handle,
            from: Some(from),
            to: Some(to),
            ty: non_empty(ty),
            attrs: AttrList::new(),
            pos: None,
        });
        self.edges.push(handle);
        self.edges_by_id.insert(key, handle);
        self.node_slots[from.index()].edges_from.push(handle);
        self.node_slots[to.index()].edges_to.push(handle);
        Ok((handle, false))
    }

    /// Looks up a live node by id.
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.nodes_by_id.get(id).copied()
    }

    /// Looks up a live edge by its identity triple.
    pub fn find_edge(&self, from: NodeId, to: NodeId, ty: &str) -> Option<EdgeId> {
        self.edges_by_id.get(&(from, to, Box::from(ty))).copied()
    }

    /// All live edges from `from` to `to`, of any type, in creation order.
    pub fn find_edges(&self, from: NodeId, to: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.node(from)
            .into_iter()
            .flat_map(Node::edges_from)
            .filter(move |&e| self.edge(e).and_then(Edge::to) == Some(to))
    }

    /// Whether `handle` names a node that has not been deleted.
    pub fn contains_node(&self, handle: NodeId) -> bool {
        self.node_slots
            .get(handle.index())
            .is_some_and(|node| self.nodes_by_id.get(node.id.as_str()) == Some(&handle))
    }

    /// Whether `handle` names an edge that has not been deleted.
    pub fn contains_edge(&self, handle: EdgeId) -> bool {
        self.edge_key(handle)
            .is_some_and(|key| self.edges_by_id.get(&key) == Some(&handle))
    }

    /// Resolves a node handle, including deleted nodes.
    pub fn node(&self, handle: NodeId) -> Option<&Node> {
        self.node_slots.get(handle.index())
    }

    pub fn node_mut(&mut self, handle: NodeId) -> Option<&mut Node> {
        self.node_slots.get_mut(handle.index())
    }

    /// Resolves an edge handle, including deleted edges.
    pub fn edge(&self, handle: EdgeId) -> Option<&Edge> {
        self.edge_slots.get(handle.index())
    }

    pub fn edge_mut(&mut self, handle: EdgeId) -> Option<&mut Edge> {
        self.edge_slots.get_mut(handle.index())
    }

    /// Live nodes in graph order: insertion order, or rank order after a
    /// successful [`Graph::sort_topo`].
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().map(|&n| &self.node_slots[n.index()])
    }

    /// Live edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().map(|&e| &self.edge_slots[e.index()])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Deletes a node and every edge touching it. Returns `false` if the
    /// node was already gone.
    ///
    /// Removed edges keep their record with the endpoint that pointed at
    /// this node cleared.
    pub fn delete_node(&mut self, handle: NodeId) -> bool {
        if !self.contains_node(handle) {
            return false;
        }

        let node = &mut self.node_slots[handle.index()];
        let outgoing = std::mem::take(&mut node.edges_from);
        let incoming = std::mem::take(&mut node.edges_to);
        let id = node.id.clone();

        for e in outgoing {
            self.unlink_edge(e);
            self.edge_slots[e.index()].from = None;
        }
        for e in incoming {
            self.unlink_edge(e);
            self.edge_slots[e.index()].to = None;
        }

        self.nodes.retain(|&n| n != handle);
        self.nodes_by_id.remove(&id);

        #[cfg(feature = "tracing")]
        tracing::debug!(node = %id, "deleted node");

        true
    }

    /// Deletes an edge. Returns `false` if the edge was already gone.
    pub fn delete_edge(&mut self, handle: EdgeId) -> bool {
        self.unlink_edge(handle)
    }

    /// Stably reorders nodes so every edge points from a lower rank to a
    /// higher one.
    ///
    /// On failure the node order is left as it was.
    pub fn sort_topo(&mut self) -> Result<(), GraphError> {
        let mut order = std::mem::take(&mut self.nodes);
        let ranked = topo::rank_and_sort(self, &mut order);
        self.nodes = order;
        ranked.map_err(GraphError::from)
    }

    /// Canonical text form, as UTF-8 bytes.
    pub fn marshal_text(&self) -> Vec<u8> {
        marshal::render(self).into_bytes()
    }

    fn edge_key(&self, handle: EdgeId) -> Option<EdgeKey> {
        let edge = self.edge_slots.get(handle.index())?;
        Some((edge.from?, edge.to?, Box::from(edge.ty())))
    }

    fn unlink_edge(&mut self, handle: EdgeId) -> bool {
        let Some(key) = self.edge_key(handle) else {
            return false;
        };
        if self.edges_by_id.get(&key) != Some(&handle) {
            return false;
        }
        let (from, to, _) = &key;
        self.node_slots[from.index()]
            .edges_from
            .retain(|e| *e != handle);
        self.node_slots[to.index()].edges_to.retain(|e| *e != handle);
        self.edges.retain(|&e| e != handle);
        self.edges_by_id.remove(&key);
        true
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&marshal::render(self))
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
