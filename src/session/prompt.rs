// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Request text sent to the agent: the system prompt, the serialized graph context, and the
//! composed user turn.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::attachments::Attachment;
use crate::model::Graph;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a process-risk analyst working on a shared \
diagram. The diagram is a directed graph of process steps; each step may carry risks and each \
risk may carry controls. Change the diagram only through the provided tools: add_node, \
connect_nodes, add_risk, add_control and clear_graph. Use short, stable ids (for example \
`intake`, `approve`) so later calls in the same reply can refer to them. Calls are applied in \
order, so create nodes before connecting them. Keep prose brief and explain what you changed.";

#[derive(Debug, Serialize)]
struct ContextView<'a> {
    nodes: Vec<ContextNode<'a>>,
    edges: Vec<ContextEdge<'a>>,
}

#[derive(Debug, Serialize)]
struct ContextNode<'a> {
    id: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    risks: Vec<ContextRisk<'a>>,
}

#[derive(Debug, Serialize)]
struct ContextRisk<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    controls: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct ContextEdge<'a> {
    source: &'a str,
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
}

/// Compact JSON snapshot of the graph for the agent. Positions are omitted.
pub fn graph_context_json(graph: &Graph) -> String {
    let view = ContextView {
        nodes: graph
            .nodes()
            .iter()
            .map(|node| ContextNode {
                id: node.id().as_str(),
                title: node.title(),
                risks: node
                    .risks()
                    .iter()
                    .map(|risk| ContextRisk {
                        name: risk.name(),
                        controls: risk.controls().iter().map(|control| control.name()).collect(),
                    })
                    .collect(),
            })
            .collect(),
        edges: graph
            .edges()
            .iter()
            .map(|edge| ContextEdge {
                source: edge.source().as_str(),
                target: edge.target().as_str(),
                label: edge.label(),
            })
            .collect(),
    };

    match serde_json::to_string(&view) {
        Ok(json) => json,
        Err(err) => {
            tracing::warn!(error = %err, "graph context serialization failed");
            "{}".to_owned()
        }
    }
}

/// Builds the text of the outgoing user message: current diagram, the user's words, then each
/// attachment cut to `char_limit` characters.
pub fn compose_user_turn(
    text: &str,
    attachments: &[Attachment],
    char_limit: usize,
    graph: &Graph,
) -> String {
    let mut out = String::new();
    out.push_str("Current diagram:\n");
    out.push_str(&graph_context_json(graph));
    out.push_str("\n\n");

    let text = text.trim();
    if !text.is_empty() {
        out.push_str(text);
    }

    for attachment in attachments {
        if !out.ends_with("\n\n") {
            out.push_str("\n\n");
        }
        out.push_str(&format!(
            "Attached file: {} ({}, {} bytes)\n",
            attachment.name, attachment.media_type, attachment.size
        ));
        out.push_str(&attachment.excerpt(char_limit));
    }

    out.trim_end().to_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CannedPrompt {
    SampleProcess,
    IdentifyRisks,
    SuggestControls,
    Review,
}

impl CannedPrompt {
    pub const ALL: [CannedPrompt; 4] = [
        CannedPrompt::SampleProcess,
        CannedPrompt::IdentifyRisks,
        CannedPrompt::SuggestControls,
        CannedPrompt::Review,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::SampleProcess => "generate",
            Self::IdentifyRisks => "risks",
            Self::SuggestControls => "controls",
            Self::Review => "review",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::SampleProcess => {
                "Clear the canvas and generate a sample business process of five to seven steps, \
                 connected in order, with labelled branches where a decision is made."
            }
            Self::IdentifyRisks => {
                "Identify the main risks for each step of the current process and add them to \
                 the matching steps."
            }
            Self::SuggestControls => {
                "Suggest one or two controls for every risk in the diagram and attach them to \
                 the matching risks."
            }
            Self::Review => {
                "Review the diagram. Point out missing steps, unconnected steps, and risks that \
                 have no controls. Do not change the diagram."
            }
        }
    }
}

impl fmt::Display for CannedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCannedPrompt(pub String);

impl fmt::Display for UnknownCannedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown preset {:?} (expected generate, risks, controls or review)",
            self.0
        )
    }
}

impl std::error::Error for UnknownCannedPrompt {}

impl FromStr for CannedPrompt {
    type Err = UnknownCannedPrompt;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|preset| preset.keyword() == wanted)
            .ok_or_else(|| UnknownCannedPrompt(s.to_owned()))
    }
}
