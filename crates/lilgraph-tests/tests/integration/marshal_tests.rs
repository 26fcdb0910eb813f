use lilgraph_core::{parse_str, Graph};
use pretty_assertions::assert_eq;

use super::support::fixture;

fn marshal(src: &str) -> String {
    let graph = parse_str(src).unwrap_or_else(|e| panic!("parsing {src:?}: {e}"));
    String::from_utf8(graph.marshal_text()).unwrap()
}

#[test]
fn readme_example_canonical_form() {
    assert_eq!(
        marshal(&fixture("readme_example.lilgraph")),
        "web [service; port=443, owner=\"team web\"]\n\
         api [service; port=8080]\n\
         db [datastore; engine=postgres]\n\
         cache [datastore]\n\
         web -[calls; proto=https]-> api\n\
         api -[reads]-> db\n\
         api -[reads]-> cache\n\
         api -[writes; batch=true]-> db\n"
    );
}

#[test]
fn chains_are_split_into_single_hops() {
    assert_eq!(marshal("A -> B -> C\n"), "A -> B\nB -> C\n");
    assert_eq!(
        marshal("A -[t]-> B -[k=v]-> C\n"),
        "A -[t]-> B\nB -[k=v]-> C\n"
    );
}

#[test]
fn quoted_values_survive() {
    assert_eq!(
        marshal("foo [bar=\"baz \\\"quoted\\\"\"]\n"),
        "foo [bar=\"baz \\\"quoted\\\"\"]\n"
    );
    assert_eq!(
        marshal("A [k=\"\", multi=\"line one\nline two\"]\n"),
        "A [k=\"\", multi=\"line one\nline two\"]\n"
    );
}

#[test]
fn source_order_is_kept_across_item_kinds() {
    assert_eq!(
        marshal("A -> B\nB [t]\nC\nA -[x]-> C\n"),
        "A -> B\nB [t]\nC\nA -[x]-> C\n"
    );
}

#[test]
fn repeated_declarations_collapse_into_the_first() {
    assert_eq!(
        marshal("A [k1=v1]\nB\nA [t; k2=v2]\nA -> B\nA -> B\n"),
        "A [t; k1=v1, k2=v2]\nB\nA -> B\n"
    );
}

#[test]
fn added_items_follow_parsed_ones() {
    let mut graph = parse_str("A [t]\nA -> B\n").unwrap();
    let a = graph.find("A").unwrap();
    let (c, _) = graph.add_node("C", "new").unwrap();
    graph.add_edge(a, c, "").unwrap();
    let (d, _) = graph.add_node("D", "").unwrap();
    graph.node_mut(d).unwrap().set_attr("k", "v").unwrap();

    assert_eq!(
        graph.to_string(),
        "A [t]\nA -> B\nC [new]\nD [k=v]\nA -> C\n"
    );
}

#[test]
fn output_reparses_to_the_same_text() {
    let src = fixture("happy/node-attrs.lilgraph");
    let once = marshal(&src);
    assert_eq!(marshal(&once), once);

    let twice: Graph = parse_str(&once).unwrap();
    assert_eq!(twice.node_count(), 4);
}
