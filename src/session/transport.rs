// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Agent transport seam.
//!
//! The HTTP client that talks to the model provider lives outside this crate; the session only
//! depends on the [`AgentTransport`] trait.

use std::collections::VecDeque;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::decode::AgentReply;
use crate::ops::ToolSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRequest {
    pub system_prompt: String,
    pub tools: Vec<ToolSpec>,
    pub messages: Vec<Message>,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("agent returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode agent response: {0}")]
    Decode(String),
    #[error("no scripted reply left")]
    Exhausted,
}

#[async_trait]
pub trait AgentTransport: Send + Sync {
    async fn send(&self, request: &AgentRequest) -> Result<AgentReply, TransportError>;
}

/// Transport that replays a fixed queue of replies and records every request it receives.
///
/// Backs the offline terminal mode and the test suite.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<AgentReply, TransportError>>>,
    requests: Mutex<Vec<AgentRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: impl IntoIterator<Item = AgentReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Parses a JSON array of replies. Each entry is a string, a block array, or a message
    /// envelope; anything else is kept as its raw JSON text.
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<Value> = serde_json::from_str(input)?;
        let replies = entries
            .iter()
            .map(|entry| {
                AgentReply::from_json(entry).unwrap_or_else(|| AgentReply::text(entry.to_string()))
            })
            .collect::<Vec<_>>();
        Ok(Self::with_replies(replies))
    }

    pub async fn push_reply(&self, reply: AgentReply) {
        self.replies.lock().await.push_back(Ok(reply));
    }

    pub async fn push_error(&self, error: TransportError) {
        self.replies.lock().await.push_back(Err(error));
    }

    pub async fn requests(&self) -> Vec<AgentRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn remaining(&self) -> usize {
        self.replies.lock().await.len()
    }
}

#[async_trait]
impl AgentTransport for ScriptedTransport {
    async fn send(&self, request: &AgentRequest) -> Result<AgentReply, TransportError> {
        self.requests.lock().await.push(request.clone());
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or(Err(TransportError::Exhausted))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{AgentRequest, AgentTransport, ScriptedTransport, TransportError};
    use crate::decode::AgentReply;

    fn request() -> AgentRequest {
        AgentRequest {
            system_prompt: "sys".to_owned(),
            tools: Vec::new(),
            messages: Vec::new(),
        }
    }

    #[tokio::test]
    async fn replays_in_order_then_reports_exhaustion() {
        let transport = ScriptedTransport::from_json_str(
            r#"["first", [{"type": "text", "text": "second"}], 3]"#,
        )
        .expect("script");

        assert_eq!(transport.send(&request()).await.expect("first"), AgentReply::text("first"));
        assert!(matches!(transport.send(&request()).await, Ok(AgentReply::Blocks(_))));
        assert_eq!(transport.send(&request()).await.expect("third"), AgentReply::text("3"));
        assert!(matches!(transport.send(&request()).await, Err(TransportError::Exhausted)));
        assert_eq!(transport.requests().await.len(), 4);
    }

    #[test]
    fn request_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(request()).expect("json");
        assert_eq!(value, json!({ "systemPrompt": "sys", "tools": [], "messages": [] }));
    }
}
