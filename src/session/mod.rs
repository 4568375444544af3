// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Conversation session.
//!
//! Owns the transcript and the graph store, and drives one agent round trip at a time:
//! compose the request, release the lock while the transport runs, then decode and commit the
//! reply as a single batch. Direct edits may land while a request is in flight; the batch is
//! applied on top of whatever the graph holds when the reply arrives.

pub mod attachments;
pub mod config;
pub mod prompt;
pub mod transport;

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

pub use attachments::{
    read_attachment, read_attachments, Attachment, AttachmentEncoding, AttachmentError,
};
pub use config::{
    ConfigError, SessionConfig, DEFAULT_ACKNOWLEDGEMENT, DEFAULT_ATTACHMENT_CHAR_LIMIT,
    DEFAULT_HISTORY_WINDOW,
};
pub use prompt::{
    compose_user_turn, graph_context_json, CannedPrompt, UnknownCannedPrompt,
    DEFAULT_SYSTEM_PROMPT,
};
pub use transport::{
    AgentRequest, AgentTransport, Message, Role, ScriptedTransport, TransportError,
};

use crate::decode::decode_reply;
use crate::model::Graph;
use crate::ops::{tool_specs, BatchReport};
use crate::store::{export_json, write_export, ExportError, GraphStore};

const EMPTY_REPLY_TEXT: &str = "The assistant returned an empty response.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Sending,
}

/// What the user submits: free text, attachments, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTurn {
    pub text: String,
    pub attachments: Vec<Attachment>,
}

impl UserTurn {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.attachments.is_empty()
    }

    /// Transcript form: the typed text plus the names of attached files.
    fn transcript_text(&self) -> String {
        let text = self.text.trim();
        if self.attachments.is_empty() {
            return text.to_owned();
        }
        let names = self
            .attachments
            .iter()
            .map(|attachment| attachment.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        if text.is_empty() {
            format!("[attached: {names}]")
        } else {
            format!("{text}\n[attached: {names}]")
        }
    }
}

#[derive(Debug)]
pub enum TurnOutcome {
    Applied { report: BatchReport, rev: u64 },
    Failed { error: TransportError },
}

#[derive(Debug)]
pub struct SendResult {
    /// The assistant turn appended to the transcript.
    pub reply: Message,
    pub outcome: TurnOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    Busy,
    EmptyTurn,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => f.write_str("a request is already in flight"),
            Self::EmptyTurn => f.write_str("nothing to send"),
        }
    }
}

impl std::error::Error for SessionError {}

#[derive(Debug)]
struct SessionInner {
    store: GraphStore,
    history: Vec<Message>,
}

/// Holds the single in-flight slot. Dropping it returns the session to idle, including when the
/// send future is cancelled or the transport panics.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct ConversationSession {
    inner: Arc<Mutex<SessionInner>>,
    sending: Arc<AtomicBool>,
    transport: Arc<dyn AgentTransport>,
    config: Arc<SessionConfig>,
}

impl fmt::Debug for ConversationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationSession")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ConversationSession {
    pub fn new(store: GraphStore, transport: Arc<dyn AgentTransport>, config: SessionConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                store,
                history: Vec::new(),
            })),
            sending: Arc::new(AtomicBool::new(false)),
            transport,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub async fn state(&self) -> SessionState {
        if self.sending.load(Ordering::Acquire) {
            SessionState::Sending
        } else {
            SessionState::Idle
        }
    }

    pub async fn snapshot(&self) -> Arc<Graph> {
        self.inner.lock().await.store.snapshot()
    }

    pub async fn rev(&self) -> u64 {
        self.inner.lock().await.store.rev()
    }

    /// Full transcript, oldest first.
    pub async fn history(&self) -> Vec<Message> {
        self.inner.lock().await.history.clone()
    }

    /// Direct manipulation. Runs under the same lock as the batch commit, so an edit never
    /// observes a half-applied batch.
    pub async fn edit<R>(&self, edit: impl FnOnce(&mut GraphStore) -> R) -> R {
        let mut inner = self.inner.lock().await;
        edit(&mut inner.store)
    }

    pub async fn send_canned(&self, prompt: CannedPrompt) -> Result<SendResult, SessionError> {
        self.send(UserTurn::text(prompt.text())).await
    }

    pub async fn send(&self, turn: UserTurn) -> Result<SendResult, SessionError> {
        let (request, in_flight) = {
            let mut inner = self.inner.lock().await;
            let in_flight = InFlight::acquire(&self.sending).ok_or(SessionError::Busy)?;
            if turn.is_empty() {
                return Err(SessionError::EmptyTurn);
            }

            let window_start = inner.history.len().saturating_sub(self.config.history_window);
            let mut messages = inner.history[window_start..].to_vec();
            messages.push(Message::user(compose_user_turn(
                &turn.text,
                &turn.attachments,
                self.config.attachment_char_limit,
                inner.store.graph(),
            )));

            inner.history.push(Message::user(turn.transcript_text()));
            tracing::info!(window = messages.len() - 1, "sending turn");

            let request = AgentRequest {
                system_prompt: self.config.system_prompt.clone(),
                tools: tool_specs(),
                messages,
            };
            (request, in_flight)
        };

        let response = self.transport.send(&request).await;

        let mut inner = self.inner.lock().await;
        let (reply, outcome) = match response {
            Ok(agent_reply) => {
                let decoded = decode_reply(&agent_reply);
                let report = inner.store.apply_batch(&decoded.calls);

                let mut lines = Vec::with_capacity(report.log.len() + 1);
                let display = decoded.display_text(report.applied, &self.config.acknowledgement);
                if !display.is_empty() {
                    lines.push(display);
                }
                lines.extend(report.log.iter().cloned());
                let content = if lines.is_empty() {
                    EMPTY_REPLY_TEXT.to_owned()
                } else {
                    lines.join("\n")
                };

                let rev = inner.store.rev();
                (
                    Message::assistant(content),
                    TurnOutcome::Applied { report, rev },
                )
            }
            Err(error) => {
                tracing::warn!(error = %error, "agent request failed");
                (
                    Message::assistant(format!("Error: {error}")),
                    TurnOutcome::Failed { error },
                )
            }
        };

        inner.history.push(reply.clone());
        drop(in_flight);
        tracing::info!(turns = inner.history.len(), "turn complete");

        Ok(SendResult { reply, outcome })
    }

    pub async fn export_json(&self) -> Result<String, ExportError> {
        let graph = self.snapshot().await;
        export_json(&graph)
    }

    pub async fn export_to(&self, path: &Path) -> Result<(), ExportError> {
        let graph = self.snapshot().await;
        write_export(path, &graph)
    }
}
