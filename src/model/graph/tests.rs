// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;

use super::{ControlDraft, Graph, NodeEdit, Position, RiskDraft};
use crate::model::NodeId;

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn three_nodes() -> Graph {
    let mut graph = Graph::new();
    graph.add_node(Some(nid("a")), "A").expect("a");
    graph.add_node(Some(nid("b")), "B").expect("b");
    graph.add_node(Some(nid("c")), "C").expect("c");
    graph.connect("a", "b", None).expect("a->b");
    graph.connect("b", "c", Some("next")).expect("b->c");
    graph.connect("c", "a", None).expect("c->a");
    graph
}

#[rstest]
#[case(0, Position::new(60, 60))]
#[case(3, Position::new(780, 60))]
#[case(4, Position::new(60, 220))]
#[case(9, Position::new(300, 380))]
fn default_slot_follows_four_column_grid(#[case] index: usize, #[case] expected: Position) {
    assert_eq!(Position::slot(index), expected);
}

#[test]
fn add_node_generates_ids_and_assigns_slots() {
    let mut graph = Graph::new();
    let first = graph.add_node(None, "Receive order").expect("first");
    let second = graph.add_node(None, "Ship order").expect("second");

    assert_ne!(first, second);
    assert_eq!(graph.node(first.as_str()).expect("first node").position(), Position::slot(0));
    assert_eq!(graph.node(second.as_str()).expect("second node").position(), Position::slot(1));
}

#[test]
fn add_node_with_colliding_id_leaves_graph_untouched() {
    let mut graph = three_nodes();
    let before = graph.clone();

    assert_eq!(graph.add_node(Some(nid("a")), "Other"), None);
    assert_eq!(graph, before);
}

#[test]
fn add_node_rejects_blank_title() {
    let mut graph = Graph::new();
    assert_eq!(graph.add_node(Some(nid("a")), "   "), None);
    assert!(graph.is_empty());
}

#[test]
fn generated_node_id_skips_explicit_ids_already_taken() {
    let mut graph = Graph::new();
    graph.add_node(Some(nid("n1")), "Explicit").expect("explicit");
    let generated = graph.add_node(None, "Generated").expect("generated");
    assert_ne!(generated.as_str(), "n1");
}

#[test]
fn connect_twice_yields_one_edge() {
    let mut graph = Graph::new();
    graph.add_node(Some(nid("a")), "A").expect("a");
    graph.add_node(Some(nid("b")), "B").expect("b");

    assert!(graph.connect("a", "b", None).is_some());
    assert!(graph.connect("a", "b", Some("again")).is_none());
    assert_eq!(graph.edges().len(), 1);

    // The reverse direction is a different pair.
    assert!(graph.connect("b", "a", None).is_some());
    assert_eq!(graph.edges().len(), 2);
}

#[test]
fn connect_requires_both_endpoints() {
    let mut graph = Graph::new();
    graph.add_node(Some(nid("a")), "A").expect("a");
    assert!(graph.connect("a", "missing", None).is_none());
    assert!(graph.connect("missing", "a", None).is_none());
    assert!(graph.edges().is_empty());
}

#[test]
fn blank_edge_label_is_dropped() {
    let mut graph = Graph::new();
    graph.add_node(Some(nid("a")), "A").expect("a");
    graph.add_node(Some(nid("b")), "B").expect("b");
    let edge_id = graph.connect("a", "b", Some("  ")).expect("edge");
    assert_eq!(graph.edge(edge_id.as_str()).expect("edge").label(), None);
}

#[test]
fn delete_node_cascades_to_incident_edges_only() {
    let mut graph = three_nodes();
    graph.add_node(Some(nid("d")), "D").expect("d");
    graph.connect("c", "d", None).expect("c->d");

    assert!(graph.delete_node("a"));

    assert!(!graph.contains_node("a"));
    assert_eq!(graph.nodes().len(), 3);
    let pairs = graph
        .edges()
        .iter()
        .map(|e| (e.source().as_str(), e.target().as_str()))
        .collect::<Vec<_>>();
    assert_eq!(pairs, vec![("b", "c"), ("c", "d")]);
}

#[test]
fn delete_missing_node_is_noop() {
    let mut graph = three_nodes();
    let before = graph.clone();
    assert!(!graph.delete_node("zzz"));
    assert_eq!(graph, before);
}

#[test]
fn add_control_matches_risk_name_case_insensitively() {
    let mut graph = three_nodes();
    graph.add_risk("a", "Fraud").expect("risk");

    let control_id = graph.add_control("a", "fraud", "Review").expect("control");

    let risk = graph.node("a").and_then(|n| n.risk_named("FRAUD")).expect("risk");
    assert_eq!(risk.controls().len(), 1);
    assert_eq!(risk.controls()[0].id(), &control_id);
    assert_eq!(risk.controls()[0].name(), "Review");
}

#[rstest]
#[case("missing", "Fraud", "Review")]
#[case("a", "Theft", "Review")]
#[case("a", "Fraud", "  ")]
fn add_control_noop_cases(#[case] node: &str, #[case] risk: &str, #[case] name: &str) {
    let mut graph = three_nodes();
    graph.add_risk("a", "Fraud").expect("risk");
    let before = graph.clone();

    assert_eq!(graph.add_control(node, risk, name), None);
    assert_eq!(graph, before);
}

#[test]
fn add_risk_requires_node_and_name() {
    let mut graph = three_nodes();
    assert!(graph.add_risk("missing", "Fraud").is_none());
    assert!(graph.add_risk("a", "").is_none());
    assert!(graph.node("a").expect("a").risks().is_empty());
}

#[test]
fn remove_control_addresses_controls_by_id() {
    let mut graph = three_nodes();
    let risk_id = graph.add_risk("a", "Fraud").expect("risk");
    let keep = graph.add_control("a", "Fraud", "Review").expect("keep");
    let drop = graph.add_control("a", "Fraud", "Audit").expect("drop");

    assert!(graph.remove_control("a", risk_id.as_str(), drop.as_str()));
    assert!(!graph.remove_control("a", risk_id.as_str(), drop.as_str()));

    let risk = graph.node("a").and_then(|n| n.risk(risk_id.as_str())).expect("risk");
    assert_eq!(risk.controls().len(), 1);
    assert_eq!(risk.controls()[0].id(), &keep);
}

#[test]
fn remove_risk_is_idempotent() {
    let mut graph = three_nodes();
    let risk_id = graph.add_risk("b", "Delay").expect("risk");
    assert!(graph.remove_risk("b", risk_id.as_str()));
    assert!(!graph.remove_risk("b", risk_id.as_str()));
    assert!(!graph.remove_risk("missing", risk_id.as_str()));
}

#[test]
fn generated_ids_are_unique_across_kinds() {
    let mut graph = three_nodes();
    let r1 = graph.add_risk("a", "One").expect("r1");
    let r2 = graph.add_risk("b", "Two").expect("r2");
    let c1 = graph.add_control("a", "one", "X").expect("c1");
    let c2 = graph.add_control("b", "two", "Y").expect("c2");
    assert_ne!(r1, r2);
    assert_ne!(c1, c2);
}

#[test]
fn rename_and_move_preserve_other_fields() {
    let mut graph = three_nodes();
    graph.add_risk("a", "Fraud").expect("risk");
    let before = graph.node("a").expect("a").clone();

    assert!(graph.rename_node("a", "Intake"));
    assert!(graph.move_node("a", Position::new(5, 7)));

    let after = graph.node("a").expect("a");
    assert_eq!(after.title(), "Intake");
    assert_eq!(after.position(), Position::new(5, 7));
    assert_eq!(after.risks(), before.risks());
    assert_eq!(graph.edges().len(), 3);
}

#[test]
fn replace_risks_keeps_known_ids_and_mints_new_ones() {
    let mut graph = three_nodes();
    let fraud = graph.add_risk("a", "Fraud").expect("fraud");
    let review = graph.add_control("a", "Fraud", "Review").expect("review");
    graph.add_risk("a", "Delay").expect("delay");

    let mut edit = NodeEdit::from_node(graph.node("a").expect("a"));
    edit.title = "Intake".to_owned();
    // Drop "Delay", keep "Fraud" with its control, add a fresh risk and a blank row.
    edit.risks.truncate(1);
    edit.risks[0].controls.push(ControlDraft {
        id: None,
        name: "Dual sign-off".to_owned(),
    });
    edit.risks.push(RiskDraft {
        id: None,
        name: "Data loss".to_owned(),
        controls: Vec::new(),
    });
    edit.risks.push(RiskDraft::default());

    assert!(graph.replace_risks("a", &edit.risks));
    assert!(graph.rename_node("a", &edit.title));

    let node = graph.node("a").expect("a");
    assert_eq!(node.title(), "Intake");
    let names = node.risks().iter().map(|r| r.name()).collect::<Vec<_>>();
    assert_eq!(names, vec!["Fraud", "Data loss"]);
    assert_eq!(node.risks()[0].id(), &fraud);
    assert_eq!(node.risks()[0].controls()[0].id(), &review);
    assert_eq!(node.risks()[0].controls().len(), 2);
    assert_ne!(node.risks()[1].id(), &fraud);
}

#[test]
fn replace_risks_does_not_adopt_foreign_ids() {
    let mut graph = three_nodes();
    let foreign = graph.add_risk("b", "Delay").expect("foreign");

    let drafts = vec![RiskDraft {
        id: Some(foreign.clone()),
        name: "Copied".to_owned(),
        controls: Vec::new(),
    }];
    assert!(graph.replace_risks("a", &drafts));

    let adopted = graph.node("a").expect("a").risks()[0].id().clone();
    assert_ne!(adopted, foreign);
}

#[test]
fn replace_risks_with_identical_tree_reports_no_change() {
    let mut graph = three_nodes();
    graph.add_risk("a", "Fraud").expect("risk");
    let edit = NodeEdit::from_node(graph.node("a").expect("a"));
    let before = graph.clone();

    assert!(!graph.replace_risks("a", &edit.risks));
    assert_eq!(graph, before);
}

#[test]
fn clear_empties_nodes_and_edges() {
    let mut graph = three_nodes();
    assert!(graph.clear());
    assert!(graph.is_empty());
    assert!(!graph.clear());
}
