use super::*;
use crate::foundation::error::IssueKind;
use crate::graph::style::{LineDash, NodeShape};

fn spec(json: &str) -> DiagramSpec {
    DiagramSpec::from_json_str(json).unwrap()
}

const SIMPLE: &str = r#"{
  "title": "Simple",
  "nodes": [
    {"id": "s", "label": "Start", "type": "start"},
    {"id": "p", "label": "Do X", "type": "process"},
    {"id": "e", "label": "End", "type": "end"}
  ],
  "edges": [{"from": "s", "to": "p"}, {"from": "p", "to": "e"}]
}"#;

#[test]
fn builds_nodes_and_edges_in_declaration_order() {
    let g = Graph::build(&spec(SIMPLE)).unwrap();
    assert_eq!(g.title(), "Simple");
    let ids: Vec<&str> = g.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["s", "p", "e"]);
    assert_eq!(g.edges().len(), 2);
    assert_eq!(g.edges()[0].key, EdgeKey::plain("s", "p"));
    assert_eq!(g.node("s").unwrap().kind, NodeKind::Start);
    assert_eq!(g.node("s").unwrap().style().shape, NodeShape::Oval);
    assert_eq!(g.node_position("e"), Some(2));
}

#[test]
fn edge_endpoints_always_reference_nodes() {
    let g = Graph::build(&spec(SIMPLE)).unwrap();
    for e in g.edges() {
        assert!(g.contains_node(&e.key.from));
        assert!(g.contains_node(&e.key.to));
    }
}

#[test]
fn missing_title_is_reported_by_name() {
    let err = Graph::build(&spec(r#"{"nodes": [], "edges": []}"#)).unwrap_err();
    assert!(matches!(err, FlowError::Validation(_)));
    assert_eq!(err.issues().len(), 1);
    assert_eq!(err.issues()[0].missing_field(), Some("title"));
}

#[test]
fn every_violation_is_collected() {
    let err = Graph::build(&spec(
        r#"{
          "nodes": [{"id": "a"}, {"label": "no id"}, {"id": "b", "label": "B"}],
          "edges": [{"from": "a"}, {"from": "b", "to": "ghost"}]
        }"#,
    ))
    .unwrap_err();
    let issues = err.issues();
    let fields: Vec<_> = issues.iter().filter_map(|i| i.missing_field()).collect();
    assert_eq!(fields, ["title", "label", "id", "to"]);
    assert!(issues.iter().any(|i| i.path == "$.edges[1].to"
        && i.kind == IssueKind::DanglingReference { id: "ghost".to_string() }));
    assert_eq!(issues.len(), 5);
}

#[test]
fn missing_collections_are_reported() {
    let err = Graph::build(&spec(r#"{"title": "t"}"#)).unwrap_err();
    let fields: Vec<_> = err.issues().iter().filter_map(|i| i.missing_field()).collect();
    assert_eq!(fields, ["nodes", "edges"]);
}

#[test]
fn duplicate_node_ids_are_rejected() {
    let err = Graph::build(&spec(
        r#"{"title": "t", "nodes": [{"id": "a", "label": "A"}, {"id": "a", "label": "A2"}], "edges": []}"#,
    ))
    .unwrap_err();
    assert_eq!(
        err.issues()[0].kind,
        IssueKind::DuplicateNodeId { id: "a".to_string() }
    );
    assert_eq!(err.issues()[0].path, "$.nodes[1].id");
}

#[test]
fn unknown_types_fall_back_to_default_style() {
    let g = Graph::build(&spec(
        r#"{"title": "t",
            "nodes": [{"id": "a", "label": "A", "type": "cloud"}, {"id": "b", "label": "B"}],
            "edges": [{"from": "a", "to": "b", "type": "wiggly"}]}"#,
    ))
    .unwrap();
    let a = g.node("a").unwrap();
    assert_eq!(a.kind, NodeKind::Process);
    assert_eq!(a.type_decl, TypeDecl::Unrecognized("cloud".to_string()));
    assert_eq!(a.style(), NodeKind::Process.style());
    assert_eq!(g.node("b").unwrap().type_decl, TypeDecl::Defaulted);
    assert_eq!(g.edges()[0].kind, EdgeKind::Normal);
    assert_eq!(g.edges()[0].style().dash, LineDash::Solid);
}

#[test]
fn parallel_edges_are_distinct_by_label_and_duplicates_collapse() {
    let g = Graph::build(&spec(
        r#"{"title": "t",
            "nodes": [{"id": "d", "label": "D", "type": "decision"}, {"id": "x", "label": "X"}],
            "edges": [
              {"from": "d", "to": "x", "label": "yes"},
              {"from": "d", "to": "x", "label": "no", "type": "conditional"},
              {"from": "d", "to": "x", "label": "yes", "type": "feedback"}
            ]}"#,
    ))
    .unwrap();
    assert_eq!(g.edges().len(), 2);
    assert_eq!(g.edges_between("d", "x").count(), 2);
    let yes = g.edge(&EdgeKey::new("d", "x", Some("yes"))).unwrap();
    assert_eq!(yes.kind, EdgeKind::Feedback);
    assert_eq!(g.edges()[0].key.label.as_deref(), Some("yes"));
    assert_eq!(g.successors(0), vec![1]);
    assert_eq!(g.predecessors(1), vec![0]);
}

#[test]
fn empty_edge_label_is_unlabeled() {
    assert_eq!(EdgeKey::new("a", "b", Some("")), EdgeKey::plain("a", "b"));
    assert_eq!(EdgeKey::new("a", "b", Some("y")).to_string(), "a->b[y]");
}
