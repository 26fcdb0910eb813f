use lilgraph_core::{parse_str, CycleError, GraphError};
use pretty_assertions::assert_eq;

use super::support::{fixture, node_ids};

#[test]
fn multirank_order() {
    let expected: Vec<String> =
        serde_json::from_str(&fixture("happy/multirank.expected-order.json")).unwrap();

    let mut graph = parse_str(&fixture("happy/multirank.lilgraph")).unwrap();
    graph.sort_topo().unwrap();
    assert_eq!(node_ids(&graph), expected);
}

#[test]
fn chain_sorts_in_order() {
    let mut graph = parse_str("A -> B -> C\n").unwrap();
    graph.sort_topo().unwrap();
    assert_eq!(node_ids(&graph), vec!["A", "B", "C"]);
}

#[test]
fn sort_is_stable_and_repeatable() {
    let mut graph = parse_str("C\nB\nA\nB -> A\n").unwrap();
    graph.sort_topo().unwrap();
    assert_eq!(node_ids(&graph), vec!["C", "B", "A"]);
    graph.sort_topo().unwrap();
    assert_eq!(node_ids(&graph), vec!["C", "B", "A"]);
}

#[test]
fn cyclic_documents_fail_to_sort() {
    for name in [
        "bad/cyclic-1.lilgraph",
        "bad/cyclic-2.lilgraph",
        "bad/cyclic-3.lilgraph",
        "bad/cyclic-4.lilgraph",
    ] {
        let mut graph =
            parse_str(&fixture(name)).unwrap_or_else(|e| panic!("{name} should build: {e}"));
        let before = node_ids(&graph);
        let err = graph.sort_topo().unwrap_err();
        assert!(matches!(err, GraphError::CyclicGraph(_)), "{name}: {err}");
        assert_eq!(node_ids(&graph), before, "{name}");
    }
}

#[test]
fn cycle_errors_name_the_nodes() {
    let cases = [
        ("bad/cyclic-1.lilgraph", CycleError::NoApex),
        (
            "bad/cyclic-2.lilgraph",
            CycleError::Revisited {
                node: "B".into(),
                apex: "A".into(),
            },
        ),
        (
            "bad/cyclic-3.lilgraph",
            CycleError::Revisited {
                node: "A".into(),
                apex: "Root".into(),
            },
        ),
        (
            "bad/cyclic-4.lilgraph",
            CycleError::Unreachable { node: "X".into() },
        ),
    ];
    for (name, expected) in cases {
        let mut graph = parse_str(&fixture(name)).unwrap();
        match graph.sort_topo() {
            Err(GraphError::CyclicGraph(err)) => assert_eq!(err, expected, "{name}"),
            other => panic!("{name}: expected a cycle error, got {other:?}"),
        }
    }
}

#[test]
fn deleting_the_back_edge_makes_the_graph_sortable() {
    let mut graph = parse_str("A -> B\nB -> C\nC -> A\n").unwrap();
    let c = graph.find("C").unwrap();
    let a = graph.find("A").unwrap();
    let back = graph.find_edge(c, a, "").unwrap();
    assert!(graph.delete_edge(back));

    graph.sort_topo().unwrap();
    assert_eq!(node_ids(&graph), vec!["A", "B", "C"]);
}
