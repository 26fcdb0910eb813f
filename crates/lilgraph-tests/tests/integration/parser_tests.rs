use lilgraph_frontend::{parse_graph, AstGraph, AstItem};
use pretty_assertions::assert_eq;

use super::support::fixture;

/// Compares a parsed document to a JSON fixture, ignoring source positions.
fn assert_ast_matches(input: &str, expected_json: &str) {
    let src = fixture(input);
    let parsed = parse_graph(&src).unwrap_or_else(|e| panic!("parsing {input}: {e}"));
    let expected: AstGraph = serde_json::from_str(&fixture(expected_json))
        .unwrap_or_else(|e| panic!("decoding {expected_json}: {e}"));

    assert_eq!(
        serde_json::to_value(&parsed).unwrap(),
        serde_json::to_value(&expected).unwrap(),
        "{input} did not produce the AST in {expected_json}"
    );

    // Every happy-path document must also build.
    lilgraph_core::build(&parsed).unwrap_or_else(|e| panic!("building {input}: {e}"));
}

#[test]
fn parses_simple_nodes() {
    assert_ast_matches(
        "happy/simple-nodes.lilgraph",
        "happy/simple-nodes.expected-ast.json",
    );
}

#[test]
fn parses_simple_edges() {
    assert_ast_matches(
        "happy/simple-edges.lilgraph",
        "happy/simple-edges.expected-ast.json",
    );
}

#[test]
fn layout_does_not_change_edges() {
    assert_ast_matches(
        "dubious/simple-edges-multiline.lilgraph",
        "happy/simple-edges.expected-ast.json",
    );
}

#[test]
fn parses_edge_attrs() {
    assert_ast_matches(
        "happy/edge-attrs.lilgraph",
        "happy/edge-attrs.expected-ast.json",
    );
}

#[test]
fn empty_documents_parse_to_nothing() {
    let cases = [
        ("empty", ""),
        ("whitespace", "  \n\n\t \n \t\n\t"),
        (
            "only comments",
            "\n  // this page\n #intentionally\n\t/*left \nblank\n*/",
        ),
    ];
    for (name, src) in cases {
        let ast = parse_graph(src).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert!(ast.is_empty(), "{name}");

        let graph = lilgraph_core::parse(src.as_bytes()).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_eq!(graph.node_count(), 0, "{name}");
        assert_eq!(graph.edge_count(), 0, "{name}");
    }
}

#[test]
fn comments_at_eof() {
    let cases = [
        "// this comment is right at EOF",
        "# this comment is right at EOF",
        "/*this comment is right at EOF*/",
        "foo // this comment is right at EOF",
        "foo # this comment is right at EOF",
        "foo /*this comment is right at EOF*/",
        "foo\n\t\tbar -> baz // this comment is right at EOF",
        "foo\n\t\tbar -> baz # this comment is right at EOF",
        "foo\n\t\tbar -> baz /*this comment is right at EOF*/",
    ];
    for (i, src) in cases.iter().enumerate() {
        lilgraph_core::parse_str(src).unwrap_or_else(|e| panic!("case #{i}: {e}"));
    }
}

#[test]
fn fixtures_decode_into_typed_items() {
    let expected: AstGraph =
        serde_json::from_str(&fixture("happy/simple-nodes.expected-ast.json")).unwrap();
    assert_eq!(expected.items.len(), 5);
    match &expected.items[3] {
        AstItem::NodeDecl(decl) => {
            assert_eq!(decl.id, "D");
            assert_eq!(decl.ty.as_deref(), Some("svc"));
            assert_eq!(decl.attrs.get("host"), Some("localhost"));
        }
        other => panic!("expected a node declaration, got {other:?}"),
    }
}

#[test]
fn syntax_errors_carry_positions() {
    let cases = [
        // Reported where the missing target would start, past the newline.
        ("A -> ", 2),
        ("A [k=v\n", 2),
        ("A\nB -[t]- C\n", 2),
        ("A [k=\"unterminated]\n", 1),
        ("0abc\n", 1),
    ];
    for (src, line) in cases {
        let err = lilgraph_core::parse_str(src).unwrap_err();
        assert!(
            matches!(err, lilgraph_core::GraphError::ParseFailure { .. }),
            "{src:?}: {err}"
        );
        assert_eq!(err.position().map(|p| p.line), Some(line), "{src:?}: {err}");
    }
}
