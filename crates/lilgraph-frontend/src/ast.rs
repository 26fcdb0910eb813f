//! # Abstract Syntax Tree
//!
//! A lilgraph document is a flat list of top-level items, kept in source
//! order:
//!
//! - **Node declarations**: `A`, `A [type]`, `A [type; k=v, ...]`, `A [k=v]`
//! - **Edge chains**: `A -> B -[type; k=v]-> C ...`
//!
//! The AST is an unvalidated, faithful record of the source. Identity
//! resolution, type merging and loop checks happen when the AST is
//! materialized into a graph.
//!
//! With the `serde` feature every type here (de)serializes to the JSON
//! shape used by test fixtures. Source positions are skipped in both
//! directions, so a fixture compares equal to a parsed AST regardless of
//! layout.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::SourcePosition;

/// The root of a parsed lilgraph document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AstGraph {
    /// Top-level items in source order
    #[cfg_attr(feature = "serde", serde(rename = "ast_items", default))]
    pub items: Vec<AstItem>,
}

impl AstGraph {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A top-level item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "ast_type", rename_all = "snake_case"))]
pub enum AstItem {
    /// A freestanding node declaration
    #[cfg_attr(feature = "serde", serde(rename = "node_def"))]
    NodeDecl(NodeDecl),
    /// One or more edges joined head to tail
    EdgeChain(EdgeChain),
}

/// A freestanding node declaration such as `A [svc; port=80]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeDecl {
    /// The node id
    pub id: String,
    /// The declared type, if any. Never `Some("")`.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "type", default, skip_serializing_if = "Option::is_none")
    )]
    pub ty: Option<String>,
    /// Declared attributes
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Attrs::is_empty")
    )]
    pub attrs: Attrs,
    /// Position of the id token
    #[cfg_attr(feature = "serde", serde(skip))]
    pub pos: SourcePosition,
}

/// An edge chain: a starting node id followed by one or more steps.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeChain {
    /// Id of the node the chain starts from
    pub from: String,
    /// Position of the starting id token
    #[cfg_attr(feature = "serde", serde(skip))]
    pub from_pos: SourcePosition,
    /// Steps in source order; never empty for parsed input
    pub steps: Vec<EdgeStep>,
}

/// One `-[...]-> target` hop of an edge chain.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeStep {
    /// Destination node id
    pub to: String,
    /// The edge type, if any. Never `Some("")`.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "type", default, skip_serializing_if = "Option::is_none")
    )]
    pub ty: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Attrs::is_empty")
    )]
    pub attrs: Attrs,
    /// Position of the arrow token
    #[cfg_attr(feature = "serde", serde(skip))]
    pub arrow_pos: SourcePosition,
    /// Position of the destination id token
    #[cfg_attr(feature = "serde", serde(skip))]
    pub to_pos: SourcePosition,
}

/// A single `key=value` pair as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttrEntry {
    pub key: String,
    pub value: String,
    /// Position of the key token (never the value)
    #[cfg_attr(feature = "serde", serde(skip))]
    pub key_pos: SourcePosition,
}

/// An ordered attribute block.
///
/// Keys are unique; order is the order in which keys were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Attrs {
    entries: Vec<AttrEntry>,
}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// A block holding exactly one entry.
    pub fn single(entry: AttrEntry) -> Self {
        Self {
            entries: vec![entry],
        }
    }

    /// Right-biased merge: entries of `other` overwrite same-keyed entries
    /// of `self` in place (value and key position), new keys are appended.
    pub fn merge(mut self, other: Attrs) -> Self {
        for entry in other.entries {
            match self.entries.iter_mut().find(|e| e.key == entry.key) {
                Some(existing) => {
                    existing.value = entry.value;
                    existing.key_pos = entry.key_pos;
                }
                None => self.entries.push(entry),
            }
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttrEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Attrs {
    type Item = &'a AttrEntry;
    type IntoIter = std::slice::Iter<'a, AttrEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<AttrEntry> for Attrs {
    fn from_iter<I: IntoIterator<Item = AttrEntry>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Attrs::new(), |acc, entry| acc.merge(Attrs::single(entry)))
    }
}
