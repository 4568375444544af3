// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tool surface offered to the agent.
//!
//! Each tool has a typed argument struct; the same structs decode incoming calls and generate
//! the JSON schemas advertised in the request.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    AddNode,
    ConnectNodes,
    AddRisk,
    AddControl,
    ClearGraph,
}

impl ToolName {
    pub const ALL: [ToolName; 5] = [
        ToolName::AddNode,
        ToolName::ConnectNodes,
        ToolName::AddRisk,
        ToolName::AddControl,
        ToolName::ClearGraph,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddNode => "add_node",
            Self::ConnectNodes => "connect_nodes",
            Self::AddRisk => "add_risk",
            Self::AddControl => "add_control",
            Self::ClearGraph => "clear_graph",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::AddNode => {
                "Add a process step. Supply a short id when later calls need to reference it."
            }
            Self::ConnectNodes => "Draw a directed connection from one step to another.",
            Self::AddRisk => "Attach a risk to a process step.",
            Self::AddControl => "Attach a mitigating control to a named risk on a step.",
            Self::ClearGraph => "Remove every step and connection from the canvas.",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownToolName(pub String);

impl fmt::Display for UnknownToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tool '{}'", self.0)
    }
}

impl std::error::Error for UnknownToolName {}

impl FromStr for ToolName {
    type Err = UnknownToolName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == normalized)
            .ok_or_else(|| UnknownToolName(s.to_owned()))
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddNodeArgs {
    /// Optional id for the new step. An id that is already in use is ignored.
    #[serde(default)]
    pub id: Option<String>,
    /// Short title of the process step.
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectNodesArgs {
    /// Id of the step the connection starts from.
    #[serde(alias = "source_id")]
    pub source_id: String,
    /// Id of the step the connection points to.
    #[serde(alias = "target_id")]
    pub target_id: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddRiskArgs {
    /// Id of the step the risk belongs to.
    #[serde(alias = "target_id")]
    pub target_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddControlArgs {
    /// Id of the step that owns the risk.
    #[serde(alias = "target_id")]
    pub target_id: String,
    /// Name of the risk to mitigate (matched case-insensitively).
    #[serde(alias = "risk_name")]
    pub risk_name: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ClearGraphArgs {}

/// Tool definition as sent to the agent transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl ToolSpec {
    fn for_args<T: JsonSchema>(name: ToolName) -> Self {
        Self {
            name: name.as_str().to_owned(),
            description: name.description().to_owned(),
            input_schema: schemars::schema_for!(T).to_value(),
        }
    }
}

pub fn tool_specs() -> Vec<ToolSpec> {
    ToolName::ALL
        .into_iter()
        .map(|name| match name {
            ToolName::AddNode => ToolSpec::for_args::<AddNodeArgs>(name),
            ToolName::ConnectNodes => ToolSpec::for_args::<ConnectNodesArgs>(name),
            ToolName::AddRisk => ToolSpec::for_args::<AddRiskArgs>(name),
            ToolName::AddControl => ToolSpec::for_args::<AddControlArgs>(name),
            ToolName::ClearGraph => ToolSpec::for_args::<ClearGraphArgs>(name),
        })
        .collect()
}
