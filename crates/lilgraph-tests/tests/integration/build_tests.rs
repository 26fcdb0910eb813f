use lilgraph_core::{parse, parse_file, parse_str, GraphError};
use pretty_assertions::assert_eq;

use super::support::{edge_keys, fixture, fixture_path, node_ids};

#[test]
fn readme_example_builds_from_file() {
    let graph = parse_file(fixture_path("readme_example.lilgraph")).unwrap();
    assert_eq!(node_ids(&graph), vec!["web", "api", "db", "cache"]);
    assert_eq!(
        edge_keys(&graph),
        vec![
            "web->api:calls",
            "api->db:reads",
            "api->cache:reads",
            "api->db:writes",
        ]
    );

    let web = graph.node(graph.find("web").unwrap()).unwrap();
    assert_eq!(web.ty(), "service");
    assert_eq!(web.attr("owner"), Some("team web"));
    let pos = web.decl_pos().unwrap();
    assert!(pos.file.as_deref().unwrap().ends_with("readme_example.lilgraph"));
    assert_eq!(pos.line, 6);
}

#[test]
fn node_attrs_accumulate_across_declarations() {
    let graph = parse(fixture("happy/node-attrs.lilgraph").as_bytes()).unwrap();
    for id in ["A", "B", "C", "D"] {
        let node = graph.node(graph.find(id).unwrap()).unwrap();
        assert_eq!(node.id(), id);
        assert_eq!(node.ty(), "sometype");
    }

    let d = graph.node(graph.find("D").unwrap()).unwrap();
    let keys: Vec<_> = d.attrs().iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["foo", "bar", "multiline", "fancy"]);
    assert_eq!(d.attr("foo"), Some("fooval"));
    assert_eq!(d.attr("bar"), Some("barval"));
    assert_eq!(
        d.attr("multiline"),
        Some("This is a quoted string that\nspans\nmultiple\nlines, but no quotes.")
    );
    assert_eq!(
        d.attr("fancy"),
        Some(
            "It can contain \"double-quotes\" (if escaped) and 'single quotes'\n\
             and unicode もしもし and emoji 🥳"
        )
    );
}

#[test]
fn chain_links_consecutive_nodes() {
    let graph = parse_str("A -> B -> C\n").unwrap();
    assert_eq!(node_ids(&graph), vec!["A", "B", "C"]);
    assert_eq!(edge_keys(&graph), vec!["A->B:", "B->C:"]);
}

#[test]
fn edges_with_different_types_are_distinct() {
    let graph = parse_str("A -> B\nA -[x]-> B\nA -> B\n").unwrap();
    let a = graph.find("A").unwrap();
    let b = graph.find("B").unwrap();

    assert_eq!(graph.edge_count(), 2);
    let untyped = graph.find_edge(a, b, "").unwrap();
    let typed = graph.find_edge(a, b, "x").unwrap();
    assert_ne!(untyped, typed);
    assert_eq!(graph.find_edges(a, b).collect::<Vec<_>>(), vec![untyped, typed]);
}

#[test]
fn self_loops_are_rejected() {
    let err = parse(fixture("bad/self-loop.lilgraph").as_bytes()).unwrap_err();
    match &err {
        GraphError::SelfLoop { node, position } => {
            assert_eq!(node, "C");
            assert_eq!(position.as_ref().map(|p| p.line), Some(2));
        }
        other => panic!("expected a self-loop error, got {other}"),
    }
}

#[test]
fn type_conflicts_are_rejected() {
    let err = parse_str(&fixture("bad/type-conflict.lilgraph")).unwrap_err();
    match &err {
        GraphError::TypeConflict {
            node,
            existing,
            attempted,
            provenance,
            position,
        } => {
            assert_eq!(node, "A");
            assert_eq!(existing, "t1");
            assert_eq!(attempted, "t2");
            assert_eq!(provenance.as_ref().map(|p| p.line), Some(1));
            assert_eq!(position.as_ref().map(|p| p.line), Some(3));
        }
        other => panic!("expected a type conflict, got {other}"),
    }
}

#[test]
fn untyped_mentions_never_clear_a_type() {
    let graph = parse_str("A [t]\nA\nB -> A\nA []\n").unwrap();
    let a = graph.node(graph.find("A").unwrap()).unwrap();
    assert_eq!(a.ty(), "t");
}

#[test]
fn reserved_attribute_keys_are_rejected() {
    let err = parse_str(&fixture("bad/reserved-key.lilgraph")).unwrap_err();
    assert!(matches!(
        err,
        GraphError::ReservedAttributeKey { ref key, .. } if key == "Type"
    ));
    assert_eq!(err.position().map(|p| (p.line, p.column)), Some((2, 4)));
}

#[test]
fn quoted_values_are_unescaped() {
    let graph = parse_str("foo [bar=\"baz \\\"quoted\\\"\"]\n").unwrap();
    let foo = graph.node(graph.find("foo").unwrap()).unwrap();
    assert_eq!(foo.attr("bar"), Some("baz \"quoted\""));
}

#[test]
fn empty_quoted_type_means_untyped() {
    let graph = parse_str("A [\"\"]\nA [t]\n").unwrap();
    assert_eq!(graph.node(graph.find("A").unwrap()).unwrap().ty(), "t");
}
