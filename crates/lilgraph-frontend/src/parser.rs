//! # lilgraph Parser
//!
//! Turns source text into an [`AstGraph`] using the Pest parser generator.
//!
//! Pest produces a concrete parse tree; this module walks it bottom-up and
//! reduces every production through the matching function in
//! [`crate::actions`], handing each one typed [`ParserProduct`]s in grammar
//! order. No semantic validation happens here.
//!
//! ## Normalization
//!
//! Line comments are terminated by a newline in the grammar, so input that
//! does not end in `\n` gets one appended before parsing. Offsets in source
//! positions therefore refer to the normalized text, which only differs from
//! the raw text past its end.
//!
//! ## Grammar
//!
//! The grammar lives in `grammar.pest` at the crate root.

use std::borrow::Cow;
use std::sync::Arc;

use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

use crate::actions::{self, ParserProduct, Token, TokenKind};
use crate::ast::*;
use crate::errors::{FrontendError, SourcePosition};

#[derive(Parser)]
#[grammar = "../grammar.pest"]
pub struct LilgraphParser;

/// Appends a trailing newline if `source` does not already end in one.
pub fn normalize_source(source: &str) -> Cow<'_, str> {
    if source.ends_with('\n') {
        Cow::Borrowed(source)
    } else {
        let mut owned = String::with_capacity(source.len() + 1);
        owned.push_str(source);
        owned.push('\n');
        Cow::Owned(owned)
    }
}

/// Parses lilgraph source into an AST.
///
/// # Example
///
/// ```rust,ignore
/// use lilgraph_frontend::parse_graph;
///
/// let ast = parse_graph("A -> B -> C\n")?;
/// assert_eq!(ast.items.len(), 1);
/// ```
pub fn parse_graph(source: &str) -> Result<AstGraph, FrontendError> {
    parse_graph_with_file(source, None)
}

/// Like [`parse_graph`], attributing every position to `file`.
pub fn parse_graph_with_file(source: &str, file: Option<&str>) -> Result<AstGraph, FrontendError> {
    let source = normalize_source(source);
    let walker = Walker {
        file: file.map(Arc::from),
    };

    let mut pairs =
        LilgraphParser::parse(Rule::graph, &source).map_err(|e| walker.syntax_error(e))?;
    let graph = pairs
        .next()
        .ok_or_else(|| FrontendError::unexpected("parse result", "graph", "nothing"))?;
    walker.graph(graph)
}

/// Reduces the Pest parse tree through the grammar actions.
struct Walker {
    file: Option<Arc<str>>,
}

impl Walker {
    fn position(&self, pair: &Pair<'_, Rule>) -> SourcePosition {
        let start = pair.as_span().start_pos();
        let (line, column) = start.line_col();
        SourcePosition {
            file: self.file.clone(),
            line: line as u32,
            column: column as u32,
            offset: start.pos(),
        }
    }

    fn syntax_error(&self, err: pest::error::Error<Rule>) -> FrontendError {
        let (line, column) = match err.line_col {
            pest::error::LineColLocation::Pos(lc) => lc,
            pest::error::LineColLocation::Span(start, _) => start,
        };
        let offset = match err.location {
            pest::error::InputLocation::Pos(p) => p,
            pest::error::InputLocation::Span((start, _)) => start,
        };
        FrontendError::Syntax {
            message: err.variant.message().into_owned(),
            position: SourcePosition {
                file: self.file.clone(),
                line: line as u32,
                column: column as u32,
                offset,
            },
        }
    }

    fn token(&self, pair: &Pair<'_, Rule>, kind: TokenKind) -> Token {
        Token::new(kind, pair.as_str(), self.position(pair))
    }

    /// Reduces one pair to the product its rule stands for.
    fn product(&self, pair: Pair<'_, Rule>) -> Result<ParserProduct, FrontendError> {
        let product = match pair.as_rule() {
            Rule::ident => self.token(&pair, TokenKind::Ident).into(),
            Rule::bare_value => self.token(&pair, TokenKind::BareValue).into(),
            Rule::quoted => ParserProduct::Literal(actions::unquote(
                self.token(&pair, TokenKind::QuotedString).into(),
            )?),
            Rule::plain_arrow | Rule::open_arrow => self.token(&pair, TokenKind::Arrow).into(),
            Rule::type_name => {
                let mut inner = pair.into_inner();
                self.next_product(&mut inner)?
            }
            Rule::attr => self.attr(pair)?.into(),
            Rule::attr_list => self.attr_list(pair)?.into(),
            Rule::edge_step => ParserProduct::Step(self.edge_step(pair)?),
            Rule::edge_chain => ParserProduct::Item(AstItem::EdgeChain(self.edge_chain(pair)?)),
            Rule::node_decl => self.node_decl(pair)?.into(),
            _ => ParserProduct::Absent,
        };
        Ok(product)
    }

    /// Next child as a product, `Absent` once the children run out.
    fn next_product(&self, inner: &mut Pairs<'_, Rule>) -> Result<ParserProduct, FrontendError> {
        match inner.next() {
            Some(pair) => self.product(pair),
            None => Ok(ParserProduct::Absent),
        }
    }

    fn graph(&self, pair: Pair<'_, Rule>) -> Result<AstGraph, FrontendError> {
        let mut graph = actions::new_graph(ParserProduct::Absent)?;
        for item in pair.into_inner() {
            if item.as_rule() == Rule::EOI {
                continue;
            }
            let item = self.product(item)?;
            graph = actions::append_graph_item(ParserProduct::Graph(graph), item)?;
        }
        Ok(graph)
    }

    fn node_decl(&self, pair: Pair<'_, Rule>) -> Result<NodeDecl, FrontendError> {
        let mut inner = pair.into_inner();
        let id = self.next_product(&mut inner)?;
        let mut ty = ParserProduct::Absent;
        let mut attrs = ParserProduct::Absent;
        for p in inner {
            match p.as_rule() {
                Rule::attr_list => attrs = self.product(p)?,
                _ => ty = self.product(p)?,
            }
        }
        actions::new_node_decl(id, ty, attrs)
    }

    fn edge_chain(&self, pair: Pair<'_, Rule>) -> Result<EdgeChain, FrontendError> {
        let mut inner = pair.into_inner();
        let from = self.next_product(&mut inner)?;
        let first = self.next_product(&mut inner)?;
        let mut chain = actions::new_edge_chain(from, first)?;
        for step in inner {
            chain = actions::extend_edge_chain(ParserProduct::Chain(chain), self.product(step)?)?;
        }
        Ok(chain)
    }

    fn edge_step(&self, pair: Pair<'_, Rule>) -> Result<EdgeStep, FrontendError> {
        let mut inner = pair.into_inner();
        let arrow = self.next_product(&mut inner)?;
        let mut ty = ParserProduct::Absent;
        let mut attrs = ParserProduct::Absent;
        let mut to = ParserProduct::Absent;
        for p in inner {
            match p.as_rule() {
                Rule::type_name => ty = self.product(p)?,
                Rule::attr_list => attrs = self.product(p)?,
                _ => to = self.product(p)?,
            }
        }
        actions::new_edge_step(arrow, to, ty, attrs)
    }

    fn attr_list(&self, pair: Pair<'_, Rule>) -> Result<Attrs, FrontendError> {
        let mut acc = Attrs::new();
        for attr in pair.into_inner() {
            acc = actions::merge_attrs(acc.into(), self.product(attr)?)?;
        }
        Ok(acc)
    }

    fn attr(&self, pair: Pair<'_, Rule>) -> Result<Attrs, FrontendError> {
        let mut inner = pair.into_inner();
        let key = self.next_product(&mut inner)?;
        let value = self.next_product(&mut inner)?;
        actions::new_attrs(key, value)
    }
}
