// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::{ControlId, EdgeId, Id, NodeId, RiskId};

/// Grid columns used when assigning default slots to new nodes.
pub const SLOT_COLUMNS: usize = 4;
const SLOT_ORIGIN: i32 = 60;
const SLOT_COLUMN_WIDTH: i32 = 240;
const SLOT_ROW_HEIGHT: i32 = 160;

/// Canvas position of a node.
///
/// Owned by the renderer; mutations that do not target a node's position carry it over
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Default slot for the `index`-th node: column `index % 4`, row `index / 4`.
    pub fn slot(index: usize) -> Self {
        let column = (index % SLOT_COLUMNS) as i32;
        let row = (index / SLOT_COLUMNS) as i32;
        Self {
            x: SLOT_ORIGIN.saturating_add(column.saturating_mul(SLOT_COLUMN_WIDTH)),
            y: SLOT_ORIGIN.saturating_add(row.saturating_mul(SLOT_ROW_HEIGHT)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    id: ControlId,
    name: String,
}

impl Control {
    pub fn id(&self) -> &ControlId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    id: RiskId,
    name: String,
    #[serde(default)]
    controls: Vec<Control>,
}

impl Risk {
    pub fn id(&self) -> &RiskId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, control_id: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.id.as_str() == control_id)
    }

    pub fn matches_name(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    title: String,
    #[serde(default)]
    risks: Vec<Risk>,
    #[serde(default)]
    position: Position,
}

impl Node {
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn risks(&self) -> &[Risk] {
        &self.risks
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn risk(&self, risk_id: &str) -> Option<&Risk> {
        self.risks.iter().find(|r| r.id.as_str() == risk_id)
    }

    /// First risk whose name matches `name` ignoring case and surrounding whitespace.
    pub fn risk_named(&self, name: &str) -> Option<&Risk> {
        self.risks.iter().find(|r| r.matches_name(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl Edge {
    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source.as_str() == node_id || self.target.as_str() == node_id
    }
}

/// Editable copy of one risk in the manual edit form.
///
/// `id` is `Some` for risks that already exist on the node being edited; new rows leave it
/// empty and get an id on commit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskDraft {
    pub id: Option<RiskId>,
    pub name: String,
    #[serde(default)]
    pub controls: Vec<ControlDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlDraft {
    pub id: Option<ControlId>,
    pub name: String,
}

/// Full-record edit of a node: title plus the entire risk/control tree.
///
/// The form works on this detached copy; cancelling simply drops it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeEdit {
    pub title: String,
    #[serde(default)]
    pub risks: Vec<RiskDraft>,
}

impl NodeEdit {
    pub fn from_node(node: &Node) -> Self {
        Self {
            title: node.title.clone(),
            risks: node
                .risks
                .iter()
                .map(|risk| RiskDraft {
                    id: Some(risk.id.clone()),
                    name: risk.name.clone(),
                    controls: risk
                        .controls
                        .iter()
                        .map(|control| ControlDraft {
                            id: Some(control.id.clone()),
                            name: control.name.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// The process graph: nodes with their risk/control trees, plus directed edges.
///
/// Every mutator is total: invalid input leaves the graph untouched and reports `None`/`false`
/// instead of failing. Nodes and edges keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
    #[serde(skip)]
    next_seq: u64,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id.as_str() == node_id)
    }

    pub fn contains_node(&self, node_id: &str) -> bool {
        self.node(node_id).is_some()
    }

    pub fn edge(&self, edge_id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id.as_str() == edge_id)
    }

    pub fn edge_between(&self, source: &str, target: &str) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| e.source.as_str() == source && e.target.as_str() == target)
    }

    pub fn add_node(&mut self, node_id: Option<NodeId>, title: &str) -> Option<NodeId> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let node_id = match node_id {
            Some(node_id) if self.contains_node(node_id.as_str()) => return None,
            Some(node_id) => node_id,
            None => self.allocate_id("n", |graph, candidate| graph.contains_node(candidate)),
        };
        let position = Position::slot(self.nodes.len());
        self.nodes.push(Node {
            id: node_id.clone(),
            title: title.to_owned(),
            risks: Vec::new(),
            position,
        });
        Some(node_id)
    }

    /// Removes a node together with every edge that references it.
    pub fn delete_node(&mut self, node_id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id.as_str() != node_id);
        if self.nodes.len() == before {
            return false;
        }
        self.edges.retain(|e| !e.touches(node_id));
        true
    }

    pub fn connect(&mut self, source: &str, target: &str, label: Option<&str>) -> Option<EdgeId> {
        let source = self.node(source)?.id.clone();
        let target = self.node(target)?.id.clone();
        if self.edge_between(source.as_str(), target.as_str()).is_some() {
            return None;
        }
        let label = label.map(str::trim).filter(|l| !l.is_empty()).map(ToOwned::to_owned);
        let edge_id = self.allocate_id("e", |graph, candidate| graph.edge(candidate).is_some());
        self.edges.push(Edge {
            id: edge_id.clone(),
            source,
            target,
            label,
        });
        Some(edge_id)
    }

    pub fn disconnect(&mut self, edge_id: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id.as_str() != edge_id);
        self.edges.len() != before
    }

    pub fn add_risk(&mut self, node_id: &str, name: &str) -> Option<RiskId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let index = self.node_index(node_id)?;
        let risk_id = self.allocate_id("r", |graph, candidate| graph.risk_id_taken(candidate));
        self.nodes[index].risks.push(Risk {
            id: risk_id.clone(),
            name: name.to_owned(),
            controls: Vec::new(),
        });
        Some(risk_id)
    }

    /// Appends a control to the first risk on `node_id` whose name matches `risk_name`
    /// case-insensitively.
    pub fn add_control(&mut self, node_id: &str, risk_name: &str, name: &str) -> Option<ControlId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let node_index = self.node_index(node_id)?;
        let risk_index = self.nodes[node_index]
            .risks
            .iter()
            .position(|r| r.matches_name(risk_name))?;
        let control_id =
            self.allocate_id("c", |graph, candidate| graph.control_id_taken(candidate));
        self.nodes[node_index].risks[risk_index].controls.push(Control {
            id: control_id.clone(),
            name: name.to_owned(),
        });
        Some(control_id)
    }

    pub fn remove_risk(&mut self, node_id: &str, risk_id: &str) -> bool {
        let Some(index) = self.node_index(node_id) else {
            return false;
        };
        let risks = &mut self.nodes[index].risks;
        let before = risks.len();
        risks.retain(|r| r.id.as_str() != risk_id);
        risks.len() != before
    }

    pub fn remove_control(&mut self, node_id: &str, risk_id: &str, control_id: &str) -> bool {
        let Some(index) = self.node_index(node_id) else {
            return false;
        };
        let Some(risk) = self.nodes[index].risks.iter_mut().find(|r| r.id.as_str() == risk_id)
        else {
            return false;
        };
        let before = risk.controls.len();
        risk.controls.retain(|c| c.id.as_str() != control_id);
        risk.controls.len() != before
    }

    /// Drops every node and edge. The id counter keeps running so ids are never reused within
    /// a session.
    pub fn clear(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.nodes.clear();
        self.edges.clear();
        true
    }

    pub fn rename_node(&mut self, node_id: &str, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        let Some(index) = self.node_index(node_id) else {
            return false;
        };
        if self.nodes[index].title == title {
            return false;
        }
        self.nodes[index].title = title.to_owned();
        true
    }

    pub fn move_node(&mut self, node_id: &str, position: Position) -> bool {
        let Some(index) = self.node_index(node_id) else {
            return false;
        };
        if self.nodes[index].position == position {
            return false;
        }
        self.nodes[index].position = position;
        true
    }

    /// Replaces the whole risk/control tree of a node.
    ///
    /// Rows with blank names are dropped. Draft ids are kept only when they name a record that
    /// already lives on this node and has not been claimed by an earlier row; everything else
    /// gets a fresh id.
    pub fn replace_risks(&mut self, node_id: &str, drafts: &[RiskDraft]) -> bool {
        let Some(index) = self.node_index(node_id) else {
            return false;
        };
        let existing = self.nodes[index].risks.clone();
        let mut claimed_risks: Vec<RiskId> = Vec::new();
        let mut claimed_controls: Vec<ControlId> = Vec::new();
        let mut risks = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let name = draft.name.trim();
            if name.is_empty() {
                continue;
            }
            let risk_id = match &draft.id {
                Some(id)
                    if existing.iter().any(|r| r.id == *id) && !claimed_risks.contains(id) =>
                {
                    id.clone()
                }
                _ => self.allocate_id("r", |graph, candidate| {
                    graph.risk_id_taken(candidate)
                        || claimed_risks.iter().any(|id| id.as_str() == candidate)
                }),
            };
            claimed_risks.push(risk_id.clone());

            let mut controls = Vec::with_capacity(draft.controls.len());
            for control in &draft.controls {
                let control_name = control.name.trim();
                if control_name.is_empty() {
                    continue;
                }
                let control_id = match &control.id {
                    Some(id)
                        if existing
                            .iter()
                            .any(|r| r.controls.iter().any(|c| c.id == *id))
                            && !claimed_controls.contains(id) =>
                    {
                        id.clone()
                    }
                    _ => self.allocate_id("c", |graph, candidate| {
                        graph.control_id_taken(candidate)
                            || claimed_controls.iter().any(|id| id.as_str() == candidate)
                    }),
                };
                claimed_controls.push(control_id.clone());
                controls.push(Control {
                    id: control_id,
                    name: control_name.to_owned(),
                });
            }

            risks.push(Risk {
                id: risk_id,
                name: name.to_owned(),
                controls,
            });
        }

        if risks == existing {
            return false;
        }
        self.nodes[index].risks = risks;
        true
    }

    fn node_index(&self, node_id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id.as_str() == node_id)
    }

    fn risk_id_taken(&self, candidate: &str) -> bool {
        self.nodes
            .iter()
            .flat_map(|n| n.risks.iter())
            .any(|r| r.id.as_str() == candidate)
    }

    fn control_id_taken(&self, candidate: &str) -> bool {
        self.nodes
            .iter()
            .flat_map(|n| n.risks.iter())
            .flat_map(|r| r.controls.iter())
            .any(|c| c.id.as_str() == candidate)
    }

    fn allocate_id<T>(&mut self, prefix: &str, taken: impl Fn(&Self, &str) -> bool) -> Id<T> {
        loop {
            self.next_seq = self.next_seq.saturating_add(1);
            let candidate = format!("{prefix}{}", self.next_seq);
            if !taken(self, &candidate) {
                return Id::generated(candidate);
            }
        }
    }
}

fn names_match(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}

#[cfg(test)]
mod tests;
