// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Operation interpreter.
//!
//! Agent tool calls are decoded into typed [`Op`]s and applied, in order, to a working copy of
//! the graph. The batch never fails: calls that cannot be decoded or that do not resolve against
//! the working copy are skipped, and only applied operations contribute a log line.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::{Graph, NodeId};

pub mod tools;

pub use tools::{
    tool_specs, AddControlArgs, AddNodeArgs, AddRiskArgs, ClearGraphArgs, ConnectNodesArgs,
    ToolName, ToolSpec, UnknownToolName,
};

/// One tool invocation as proposed by the agent: a tool name and a flat string argument map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCall {
    pub name: String,
    pub args: BTreeMap<String, String>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: BTreeMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Builds a call from a structured JSON input, flattening every value to a string.
    ///
    /// `null` arguments are dropped; non-object inputs yield an empty argument map.
    pub fn from_json_input(name: impl Into<String>, input: &Value) -> Self {
        let mut args = BTreeMap::new();
        if let Value::Object(map) = input {
            for (key, value) in map {
                let flat = match value {
                    Value::Null => continue,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                args.insert(key.clone(), flat);
            }
        }
        Self {
            name: name.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    ClearGraph,
    AddNode {
        node_id: Option<NodeId>,
        title: String,
    },
    ConnectNodes {
        source_id: String,
        target_id: String,
        label: Option<String>,
    },
    AddRisk {
        target_id: String,
        name: String,
    },
    AddControl {
        target_id: String,
        risk_name: String,
        name: String,
    },
}

impl Op {
    pub fn tool_name(&self) -> ToolName {
        match self {
            Self::ClearGraph => ToolName::ClearGraph,
            Self::AddNode { .. } => ToolName::AddNode,
            Self::ConnectNodes { .. } => ToolName::ConnectNodes,
            Self::AddRisk { .. } => ToolName::AddRisk,
            Self::AddControl { .. } => ToolName::AddControl,
        }
    }

    pub fn from_call(call: &ToolCall) -> Result<Self, SkipReason> {
        let tool: ToolName = call
            .name
            .parse()
            .map_err(|UnknownToolName(name)| SkipReason::UnknownTool { name })?;

        match tool {
            ToolName::ClearGraph => Ok(Self::ClearGraph),
            ToolName::AddNode => {
                let args: AddNodeArgs = parse_args(tool, call)?;
                let node_id = match args.id.as_deref().map(str::trim) {
                    None | Some("") => None,
                    Some(raw) => Some(NodeId::new(raw).map_err(|err| SkipReason::InvalidArgs {
                        tool,
                        message: format!("id: {err}"),
                    })?),
                };
                Ok(Self::AddNode {
                    node_id,
                    title: args.title,
                })
            }
            ToolName::ConnectNodes => {
                let args: ConnectNodesArgs = parse_args(tool, call)?;
                Ok(Self::ConnectNodes {
                    source_id: args.source_id,
                    target_id: args.target_id,
                    label: args.label,
                })
            }
            ToolName::AddRisk => {
                let args: AddRiskArgs = parse_args(tool, call)?;
                Ok(Self::AddRisk {
                    target_id: args.target_id,
                    name: args.name,
                })
            }
            ToolName::AddControl => {
                let args: AddControlArgs = parse_args(tool, call)?;
                Ok(Self::AddControl {
                    target_id: args.target_id,
                    risk_name: args.risk_name,
                    name: args.name,
                })
            }
        }
    }
}

fn parse_args<T: DeserializeOwned>(tool: ToolName, call: &ToolCall) -> Result<T, SkipReason> {
    let object = call
        .args
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect::<serde_json::Map<_, _>>();
    serde_json::from_value(Value::Object(object)).map_err(|err| SkipReason::InvalidArgs {
        tool,
        message: err.to_string(),
    })
}

/// Why a call in a batch was skipped. Only ever logged, never surfaced to the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnknownTool { name: String },
    InvalidArgs { tool: ToolName, message: String },
    Unresolved { tool: ToolName },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTool { name } => write!(f, "unknown tool '{name}'"),
            Self::InvalidArgs { tool, message } => {
                write!(f, "invalid arguments for {tool}: {message}")
            }
            Self::Unresolved { tool } => write!(f, "{tool} had no effect on the working graph"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// One human-readable line per applied operation, in application order.
    pub log: Vec<String>,
    pub applied: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub graph: Graph,
    pub report: BatchReport,
}

/// Applies raw agent calls to a copy of `graph`.
pub fn apply_batch(graph: &Graph, calls: &[ToolCall]) -> BatchOutcome {
    let mut working = graph.clone();
    let mut report = BatchReport::default();

    for (index, call) in calls.iter().enumerate() {
        let result = Op::from_call(call).and_then(|op| {
            apply_op(&mut working, &op).ok_or(SkipReason::Unresolved {
                tool: op.tool_name(),
            })
        });
        record(&mut report, index, result);
    }

    BatchOutcome {
        graph: working,
        report,
    }
}

/// Applies already-typed operations to a copy of `graph`.
pub fn apply_ops(graph: &Graph, ops: &[Op]) -> BatchOutcome {
    let mut working = graph.clone();
    let mut report = BatchReport::default();

    for (index, op) in ops.iter().enumerate() {
        let result = apply_op(&mut working, op).ok_or(SkipReason::Unresolved {
            tool: op.tool_name(),
        });
        record(&mut report, index, result);
    }

    BatchOutcome {
        graph: working,
        report,
    }
}

fn record(report: &mut BatchReport, index: usize, result: Result<String, SkipReason>) {
    match result {
        Ok(line) => {
            report.applied += 1;
            report.log.push(line);
        }
        Err(reason) => {
            report.skipped += 1;
            tracing::debug!(index, %reason, "skipped tool call");
        }
    }
}

// Per-operation application against the working graph.
include!("ops_impl.rs");
