// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Response decoder.
//!
//! Normalizes an agent reply into an ordered list of [`ToolCall`]s plus the narrative text to
//! show in the transcript. Structured tool-use blocks win; embedded markup is only consulted
//! when the reply carries no structured calls.

pub mod markup;
pub mod reply;

pub use markup::{contains_invocation, scan_invocations, strip_markup, Invocation};
pub use reply::{AgentReply, ContentBlock};

use crate::ops::ToolCall;

/// Where the decoded calls came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSource {
    Structured,
    Markup,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedReply {
    /// Reply text with all invocation markup removed, trimmed.
    pub narrative: String,
    /// Calls in application order.
    pub calls: Vec<ToolCall>,
    pub source: CallSource,
}

impl DecodedReply {
    /// Text for the transcript. An empty narrative is replaced by `acknowledgement` when at
    /// least one operation was applied.
    pub fn display_text(&self, applied: usize, acknowledgement: &str) -> String {
        if self.narrative.is_empty() && applied > 0 {
            acknowledgement.to_owned()
        } else {
            self.narrative.clone()
        }
    }
}

pub fn decode_reply(reply: &AgentReply) -> DecodedReply {
    let (text, structured) = match reply {
        AgentReply::Text(text) => (text.clone(), Vec::new()),
        AgentReply::Blocks(blocks) => {
            let mut texts = Vec::new();
            let mut calls = Vec::new();
            for block in blocks {
                match block {
                    ContentBlock::Text { text } => texts.push(text.as_str()),
                    ContentBlock::ToolUse { name, input, .. } => {
                        calls.push(ToolCall::from_json_input(name.clone(), input));
                    }
                }
            }
            (texts.join("\n"), calls)
        }
    };

    let invocations = scan_invocations(&text);
    let narrative = strip_markup(&text, &invocations);

    if !structured.is_empty() {
        return DecodedReply {
            narrative,
            calls: structured,
            source: CallSource::Structured,
        };
    }

    if contains_invocation(&text) {
        let calls = invocations
            .into_iter()
            .map(|invocation| ToolCall {
                name: invocation.name,
                args: invocation.params,
            })
            .collect::<Vec<_>>();
        return DecodedReply {
            narrative,
            calls,
            source: CallSource::Markup,
        };
    }

    DecodedReply {
        narrative,
        calls: Vec::new(),
        source: CallSource::None,
    }
}
