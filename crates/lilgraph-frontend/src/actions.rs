//! # Grammar Actions
//!
//! Semantic actions invoked once per grammar reduction. Each action receives
//! already-built [`ParserProduct`]s in the order the grammar defines and
//! returns a new or extended AST fragment.
//!
//! Actions never trust the shape of their inputs: a product of the wrong kind
//! yields [`FrontendError::UnexpectedProduct`] naming what was expected and
//! what arrived. With a correct grammar that error cannot occur, so seeing it
//! means the grammar and these actions have drifted apart.

use crate::ast::*;
use crate::errors::{FrontendError, SourcePosition};

/// Lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `[A-Za-z_][A-Za-z0-9_]*`
    Ident,
    /// An unquoted attribute value or type name
    BareValue,
    /// A `"..."` literal, quotes included
    QuotedString,
    /// `->` or the opening `-[` of a bracketed arrow
    Arrow,
}

impl TokenKind {
    fn describe(self) -> &'static str {
        match self {
            Self::Ident => "identifier token",
            Self::BareValue => "bare value token",
            Self::QuotedString => "quoted string token",
            Self::Arrow => "arrow token",
        }
    }
}

/// A lexeme with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lit: String,
    pub pos: SourcePosition,
}

impl Token {
    pub fn new(kind: TokenKind, lit: impl Into<String>, pos: SourcePosition) -> Self {
        Self {
            kind,
            lit: lit.into(),
            pos,
        }
    }
}

/// Anything a grammar reduction can hand to an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserProduct {
    /// An optional grammar slot that was not filled
    Absent,
    Token(Token),
    /// A plain string, e.g. an already unquoted literal
    Literal(String),
    Attrs(Attrs),
    Step(EdgeStep),
    Chain(EdgeChain),
    Item(AstItem),
    Graph(AstGraph),
}

impl ParserProduct {
    /// Human-readable kind, used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Absent => "nothing",
            Self::Token(tok) => tok.kind.describe(),
            Self::Literal(_) => "string literal",
            Self::Attrs(_) => "attrs",
            Self::Step(_) => "edge step",
            Self::Chain(_) => "edge chain",
            Self::Item(_) => "top-level item",
            Self::Graph(_) => "graph",
        }
    }
}

impl From<Token> for ParserProduct {
    fn from(tok: Token) -> Self {
        Self::Token(tok)
    }
}

impl From<Attrs> for ParserProduct {
    fn from(attrs: Attrs) -> Self {
        Self::Attrs(attrs)
    }
}

impl From<NodeDecl> for ParserProduct {
    fn from(decl: NodeDecl) -> Self {
        Self::Item(AstItem::NodeDecl(decl))
    }
}

/// Starts the top-level item list, optionally with a first item.
pub fn new_graph(item: ParserProduct) -> Result<AstGraph, FrontendError> {
    match item {
        ParserProduct::Absent => Ok(AstGraph::default()),
        ParserProduct::Item(item) => Ok(AstGraph { items: vec![item] }),
        other => Err(FrontendError::unexpected(
            "first graph item",
            "top-level item",
            other.kind(),
        )),
    }
}

/// Appends a top-level item to a graph under construction.
pub fn append_graph_item(
    graph: ParserProduct,
    item: ParserProduct,
) -> Result<AstGraph, FrontendError> {
    let mut graph = match graph {
        ParserProduct::Graph(g) => g,
        other => {
            return Err(FrontendError::unexpected(
                "graph to append to",
                "graph",
                other.kind(),
            ))
        }
    };
    match item {
        ParserProduct::Item(item) => {
            graph.items.push(item);
            Ok(graph)
        }
        other => Err(FrontendError::unexpected(
            "appended graph item",
            "top-level item",
            other.kind(),
        )),
    }
}

/// Builds a node declaration from an id token, an optional type and
/// optional attrs.
pub fn new_node_decl(
    id: ParserProduct,
    ty: ParserProduct,
    attrs: ParserProduct,
) -> Result<NodeDecl, FrontendError> {
    let id = ident_token(id, "node id")?;
    let ty = optional_type(ty, "node type")?;
    let attrs = optional_attrs(attrs, "node attrs")?;
    Ok(NodeDecl {
        id: id.lit,
        ty,
        attrs,
        pos: id.pos,
    })
}

/// Starts an edge chain from a node id token and its first step.
pub fn new_edge_chain(
    from: ParserProduct,
    step: ParserProduct,
) -> Result<EdgeChain, FrontendError> {
    let from = ident_token(from, "edge source id")?;
    let step = edge_step(step, "first edge step")?;
    Ok(EdgeChain {
        from: from.lit,
        from_pos: from.pos,
        steps: vec![step],
    })
}

/// Appends one more step to an edge chain.
pub fn extend_edge_chain(
    chain: ParserProduct,
    step: ParserProduct,
) -> Result<EdgeChain, FrontendError> {
    let mut chain = match chain {
        ParserProduct::Chain(chain) => chain,
        other => {
            return Err(FrontendError::unexpected(
                "chain to extend",
                "edge chain",
                other.kind(),
            ))
        }
    };
    chain.steps.push(edge_step(step, "chained edge step")?);
    Ok(chain)
}

/// Builds one edge step. The step's position is the arrow's position.
pub fn new_edge_step(
    arrow: ParserProduct,
    to: ParserProduct,
    ty: ParserProduct,
    attrs: ParserProduct,
) -> Result<EdgeStep, FrontendError> {
    let arrow = match arrow {
        ParserProduct::Token(tok) if tok.kind == TokenKind::Arrow => tok,
        other => {
            return Err(FrontendError::unexpected(
                "edge arrow",
                TokenKind::Arrow.describe(),
                other.kind(),
            ))
        }
    };
    let to = ident_token(to, "edge target id")?;
    let ty = optional_type(ty, "edge type")?;
    let attrs = optional_attrs(attrs, "edge attrs")?;
    Ok(EdgeStep {
        to: to.lit,
        ty,
        attrs,
        arrow_pos: arrow.pos,
        to_pos: to.pos,
    })
}

/// Builds a one-entry attribute block. The entry keeps the key's position.
pub fn new_attrs(key: ParserProduct, value: ParserProduct) -> Result<Attrs, FrontendError> {
    let key = ident_token(key, "attribute key")?;
    let value = text(value, "attribute value")?;
    Ok(Attrs::single(AttrEntry {
        key: key.lit,
        value,
        key_pos: key.pos,
    }))
}

/// Right-biased merge of two attribute blocks; later keys win.
pub fn merge_attrs(left: ParserProduct, right: ParserProduct) -> Result<Attrs, FrontendError> {
    let left = match left {
        ParserProduct::Attrs(a) => a,
        other => {
            return Err(FrontendError::unexpected(
                "left-hand attrs of merge",
                "attrs",
                other.kind(),
            ))
        }
    };
    let right = match right {
        ParserProduct::Attrs(a) => a,
        other => {
            return Err(FrontendError::unexpected(
                "right-hand attrs of merge",
                "attrs",
                other.kind(),
            ))
        }
    };
    Ok(left.merge(right))
}

/// Strips the surrounding quotes of a quoted-string token and turns `\"`
/// into `"`. No other escape is recognized; backslashes and newlines pass
/// through untouched.
pub fn unquote(quoted: ParserProduct) -> Result<String, FrontendError> {
    let tok = match quoted {
        ParserProduct::Token(tok) if tok.kind == TokenKind::QuotedString => tok,
        other => {
            return Err(FrontendError::unexpected(
                "quoted literal",
                TokenKind::QuotedString.describe(),
                other.kind(),
            ))
        }
    };
    let inner = tok
        .lit
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| {
            FrontendError::unexpected(
                "quoted literal",
                "quote-delimited text",
                "unterminated quoted string token",
            )
        })?;
    Ok(inner.replace("\\\"", "\""))
}

fn ident_token(product: ParserProduct, context: &'static str) -> Result<Token, FrontendError> {
    match product {
        ParserProduct::Token(tok) if tok.kind == TokenKind::Ident => Ok(tok),
        other => Err(FrontendError::unexpected(
            context,
            TokenKind::Ident.describe(),
            other.kind(),
        )),
    }
}

fn edge_step(product: ParserProduct, context: &'static str) -> Result<EdgeStep, FrontendError> {
    match product {
        ParserProduct::Step(step) => Ok(step),
        other => Err(FrontendError::unexpected(context, "edge step", other.kind())),
    }
}

/// String value of a plain token or a literal the grammar already produced.
fn text(product: ParserProduct, context: &'static str) -> Result<String, FrontendError> {
    match product {
        ParserProduct::Literal(s) => Ok(s),
        ParserProduct::Token(tok) if matches!(tok.kind, TokenKind::Ident | TokenKind::BareValue) => {
            Ok(tok.lit)
        }
        other => Err(FrontendError::unexpected(
            context,
            "token or string literal",
            other.kind(),
        )),
    }
}

fn optional_type(
    product: ParserProduct,
    context: &'static str,
) -> Result<Option<String>, FrontendError> {
    match product {
        ParserProduct::Absent => Ok(None),
        other => Ok(Some(text(other, context)?).filter(|t| !t.is_empty())),
    }
}

fn optional_attrs(product: ParserProduct, context: &'static str) -> Result<Attrs, FrontendError> {
    match product {
        ParserProduct::Absent => Ok(Attrs::new()),
        ParserProduct::Attrs(attrs) => Ok(attrs),
        other => Err(FrontendError::unexpected(context, "attrs", other.kind())),
    }
}
