// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One content block of a structured agent reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        name: String,
        #[serde(default)]
        input: Value,
    },
}

/// Raw reply as returned by the agent transport.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentReply {
    /// Content blocks from a transport with native tool calling.
    Blocks(Vec<ContentBlock>),
    /// A single text blob that may embed invocation markup.
    Text(String),
}

impl AgentReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Interprets a provider JSON value: `{"content": [...]}`, a bare block array, or a string.
    ///
    /// Blocks of unknown type are dropped. Returns `None` for any other shape.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Array(items) => Some(Self::Blocks(
                items
                    .iter()
                    .filter_map(|item| ContentBlock::deserialize(item).ok())
                    .collect(),
            )),
            Value::Object(map) => map.get("content").and_then(Self::from_json),
            _ => None,
        }
    }

    /// Like [`AgentReply::from_json`], but a body that is not a recognized JSON shape becomes a
    /// narrative-only text reply.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| Self::from_json(&value))
            .unwrap_or_else(|| Self::Text(body.to_owned()))
    }
}
