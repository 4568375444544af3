// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use crate::model::{
    seed_graph, ControlId, EdgeId, Graph, NodeEdit, NodeId, Position, RiskDraft, RiskId,
};
use crate::ops::{apply_batch, BatchReport, ToolCall};

/// Owner of the canonical graph.
///
/// Readers get immutable `Arc<Graph>` snapshots. Every mutation builds the next graph on a
/// private copy and swaps it in only if something changed, so a snapshot handed out earlier is
/// never affected and a no-op leaves both the snapshot and the revision untouched.
#[derive(Debug, Clone)]
pub struct GraphStore {
    current: Arc<Graph>,
    rev: u64,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl GraphStore {
    pub fn new(graph: Graph) -> Self {
        Self {
            current: Arc::new(graph),
            rev: 0,
        }
    }

    /// Store holding the default two-node starter graph.
    pub fn seeded() -> Self {
        Self::new(seed_graph())
    }

    pub fn snapshot(&self) -> Arc<Graph> {
        Arc::clone(&self.current)
    }

    pub fn graph(&self) -> &Graph {
        &self.current
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    fn update<R>(&mut self, mutate: impl FnOnce(&mut Graph) -> Option<R>) -> Option<R> {
        let mut next = Graph::clone(&self.current);
        let result = mutate(&mut next)?;
        self.current = Arc::new(next);
        self.rev = self.rev.saturating_add(1);
        Some(result)
    }

    fn update_flag(&mut self, mutate: impl FnOnce(&mut Graph) -> bool) -> bool {
        self.update(|graph| mutate(graph).then_some(())).is_some()
    }

    pub fn add_node(&mut self, node_id: Option<NodeId>, title: &str) -> Option<NodeId> {
        self.update(|graph| graph.add_node(node_id, title))
    }

    pub fn delete_node(&mut self, node_id: &str) -> bool {
        self.update_flag(|graph| graph.delete_node(node_id))
    }

    pub fn connect(&mut self, source: &str, target: &str, label: Option<&str>) -> Option<EdgeId> {
        self.update(|graph| graph.connect(source, target, label))
    }

    pub fn disconnect(&mut self, edge_id: &str) -> bool {
        self.update_flag(|graph| graph.disconnect(edge_id))
    }

    pub fn add_risk(&mut self, node_id: &str, name: &str) -> Option<RiskId> {
        self.update(|graph| graph.add_risk(node_id, name))
    }

    pub fn add_control(&mut self, node_id: &str, risk_name: &str, name: &str) -> Option<ControlId> {
        self.update(|graph| graph.add_control(node_id, risk_name, name))
    }

    pub fn remove_risk(&mut self, node_id: &str, risk_id: &str) -> bool {
        self.update_flag(|graph| graph.remove_risk(node_id, risk_id))
    }

    pub fn remove_control(&mut self, node_id: &str, risk_id: &str, control_id: &str) -> bool {
        self.update_flag(|graph| graph.remove_control(node_id, risk_id, control_id))
    }

    pub fn clear(&mut self) -> bool {
        self.update_flag(Graph::clear)
    }

    pub fn rename_node(&mut self, node_id: &str, title: &str) -> bool {
        self.update_flag(|graph| graph.rename_node(node_id, title))
    }

    pub fn replace_risks(&mut self, node_id: &str, risks: &[RiskDraft]) -> bool {
        self.update_flag(|graph| graph.replace_risks(node_id, risks))
    }

    pub fn move_node(&mut self, node_id: &str, position: Position) -> bool {
        self.update_flag(|graph| graph.move_node(node_id, position))
    }

    /// Commits the edit form: title and the full risk/control tree land in one revision.
    pub fn commit_node_edit(&mut self, node_id: &str, edit: &NodeEdit) -> bool {
        self.update_flag(|graph| {
            if !graph.contains_node(node_id) {
                return false;
            }
            let renamed = graph.rename_node(node_id, &edit.title);
            let replaced = graph.replace_risks(node_id, &edit.risks);
            renamed || replaced
        })
    }

    /// Runs an agent batch against the current snapshot and commits the result as one revision.
    pub fn apply_batch(&mut self, calls: &[ToolCall]) -> BatchReport {
        let outcome = apply_batch(&self.current, calls);
        // `clear_graph` counts as applied even on an empty canvas, so such a batch still commits.
        if outcome.report.applied > 0 {
            self.current = Arc::new(outcome.graph);
            self.rev = self.rev.saturating_add(1);
            tracing::info!(
                rev = self.rev,
                applied = outcome.report.applied,
                skipped = outcome.report.skipped,
                "committed agent batch"
            );
        }
        outcome.report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::GraphStore;
    use crate::model::{ControlDraft, Graph, NodeEdit, NodeId, Position, RiskDraft};
    use crate::ops::ToolCall;

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    #[test]
    fn snapshots_are_isolated_from_later_mutations() {
        let mut store = GraphStore::seeded();
        let before = store.snapshot();

        store.add_node(Some(nid("extra")), "Extra").expect("node");

        assert_eq!(before.nodes().len(), 2);
        assert_eq!(store.snapshot().nodes().len(), 3);
        assert_eq!(store.rev(), 1);
    }

    #[test]
    fn noop_mutations_keep_snapshot_and_rev() {
        let mut store = GraphStore::seeded();
        let before = store.snapshot();

        assert!(store.add_node(Some(nid("start")), "Again").is_none());
        assert!(store.connect("start", "end", None).is_none());
        assert!(!store.delete_node("missing"));
        assert!(!store.rename_node("start", "Start"));
        assert!(store.add_control("start", "nothing", "x").is_none());

        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(store.rev(), 0);
    }

    #[test]
    fn delete_node_cascades_in_one_revision() {
        let mut store = GraphStore::seeded();
        assert!(store.delete_node("end"));
        assert_eq!(store.rev(), 1);
        assert!(store.graph().edges().is_empty());
        assert_eq!(store.graph().nodes().len(), 1);
    }

    #[test]
    fn commit_node_edit_is_atomic() {
        let mut store = GraphStore::seeded();
        let edit = NodeEdit {
            title: "Kick-off".to_owned(),
            risks: vec![RiskDraft {
                id: None,
                name: "Scope creep".to_owned(),
                controls: vec![ControlDraft {
                    id: None,
                    name: "Change board".to_owned(),
                }],
            }],
        };

        assert!(store.commit_node_edit("start", &edit));
        assert_eq!(store.rev(), 1);

        let node = store.graph().node("start").expect("start");
        assert_eq!(node.title(), "Kick-off");
        assert_eq!(node.risks()[0].controls()[0].name(), "Change board");

        assert!(!store.commit_node_edit("missing", &edit));
        assert_eq!(store.rev(), 1);
    }

    #[test]
    fn discarded_edit_leaves_store_untouched() {
        let mut store = GraphStore::seeded();
        store.add_risk("start", "Fraud").expect("risk");
        let before = store.snapshot();

        let mut edit = NodeEdit::from_node(store.graph().node("start").expect("start"));
        edit.title = "Changed".to_owned();
        edit.risks.clear();
        drop(edit);

        assert_eq!(*store.snapshot(), *before);
    }

    #[test]
    fn remove_control_by_id() {
        let mut store = GraphStore::seeded();
        let risk = store.add_risk("start", "Fraud").expect("risk");
        let control = store.add_control("start", "FRAUD", "Review").expect("control");

        assert!(store.remove_control("start", risk.as_str(), control.as_str()));
        assert!(!store.remove_control("start", risk.as_str(), control.as_str()));
        assert!(store.remove_risk("start", risk.as_str()));
    }

    #[test]
    fn apply_batch_commits_once_and_skips_empty_outcomes() {
        let mut store = GraphStore::new(Graph::new());
        let report = store.apply_batch(&[ToolCall::new("connect_nodes")
            .with_arg("sourceId", "x")
            .with_arg("targetId", "y")]);
        assert_eq!(report.applied, 0);
        assert_eq!(store.rev(), 0);

        let report = store.apply_batch(&[
            ToolCall::new("add_node").with_arg("id", "a").with_arg("title", "A"),
            ToolCall::new("add_node").with_arg("id", "b").with_arg("title", "B"),
            ToolCall::new("connect_nodes")
                .with_arg("sourceId", "a")
                .with_arg("targetId", "b"),
        ]);
        assert_eq!(report.applied, 3);
        assert_eq!(store.rev(), 1);
        assert_eq!(store.graph().edges().len(), 1);
    }

    #[test]
    fn clear_only_batch_on_empty_canvas_still_commits() {
        let mut store = GraphStore::new(Graph::new());
        let report = store.apply_batch(&[ToolCall::new("clear_graph")]);
        assert_eq!(report.log, vec!["Cleared canvas".to_owned()]);
        assert_eq!(store.rev(), 1);
        assert!(store.graph().is_empty());
    }

    #[test]
    fn move_node_keeps_structure() {
        let mut store = GraphStore::seeded();
        assert!(store.move_node("end", Position::new(400, 90)));
        assert!(!store.move_node("end", Position::new(400, 90)));
        assert_eq!(store.graph().edges().len(), 1);
        assert_eq!(store.graph().node("end").expect("end").position(), Position::new(400, 90));
    }

    #[test]
    fn clear_resets_the_canvas() {
        let mut store = GraphStore::seeded();
        assert!(store.clear());
        assert!(store.graph().is_empty());
        assert!(!store.clear());
        assert_eq!(store.rev(), 1);
    }
}
