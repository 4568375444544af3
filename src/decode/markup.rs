// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tolerant scanner for tool invocations embedded in reply text.
//!
//! Agents without native tool calling write calls as pseudo-markup:
//!
//! ```text
//! <invoke name="add_node"><parameter name="title">Intake</parameter></invoke>
//! ```
//!
//! The scanner never fails. An opening tag without a matching close before the next opening tag
//! simply produces no invocation for that span.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::OnceLock;

use memchr::memmem;
use regex::Regex;

const INVOKE_CLOSE: &[u8] = b"</invoke>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub params: BTreeMap<String, String>,
    /// Byte range of the whole block in the scanned text, closing tag included.
    pub span: Range<usize>,
}

fn invoke_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<invoke\s+name\s*=\s*"([^"]*)"\s*>"#).expect("static invoke regex")
    })
}

fn parameter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<parameter\s+name\s*=\s*"([^"]*)"\s*>(.*?)</parameter>"#)
            .expect("static parameter regex")
    })
}

fn function_calls_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<function_calls\s*>.*?</function_calls\s*>")
            .expect("static function_calls regex")
    })
}

fn function_calls_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</?function_calls\s*>").expect("static wrapper tag regex"))
}

/// Whether `text` contains at least one opening invoke tag.
pub fn contains_invocation(text: &str) -> bool {
    memmem::find(text.as_bytes(), b"<invoke").is_some() && invoke_open_re().is_match(text)
}

/// Every complete, non-overlapping invoke block in order of appearance.
pub fn scan_invocations(text: &str) -> Vec<Invocation> {
    let bytes = text.as_bytes();
    let closer = memmem::Finder::new(INVOKE_CLOSE);
    let mut invocations = Vec::new();
    let mut cursor = 0;

    while let Some(open) = invoke_open_re().captures_at(text, cursor) {
        let (Some(tag), Some(name)) = (open.get(0), open.get(1)) else {
            break;
        };
        let body_start = tag.end();
        let Some(close) = closer.find(&bytes[body_start..]).map(|at| body_start + at) else {
            break;
        };
        let next_open = invoke_open_re().find_at(text, body_start).map(|m| m.start());

        match next_open {
            Some(next) if next < close => {
                // Unterminated block; resume at the next opening tag.
                cursor = next;
            }
            _ => {
                let end = close + INVOKE_CLOSE.len();
                invocations.push(Invocation {
                    name: name.as_str().trim().to_owned(),
                    params: scan_parameters(&text[body_start..close]),
                    span: tag.start()..end,
                });
                cursor = end;
            }
        }
    }

    invocations
}

/// Flat parameter map of one invoke body. Values are the raw text between the tags; a repeated
/// parameter name keeps its last value.
pub fn scan_parameters(body: &str) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    for captures in parameter_re().captures_iter(body) {
        let (Some(name), Some(value)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        params.insert(name.as_str().trim().to_owned(), value.as_str().to_owned());
    }
    params
}

/// Removes invoke blocks, `<function_calls>` blocks and stray wrapper tags, then trims.
pub fn strip_markup(text: &str, invocations: &[Invocation]) -> String {
    let mut spans = invocations.iter().map(|inv| inv.span.clone()).collect::<Vec<_>>();
    spans.extend(function_calls_block_re().find_iter(text).map(|m| m.range()));
    spans.extend(function_calls_tag_re().find_iter(text).map(|m| m.range()));
    spans.sort_by_key(|span| span.start);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        if span.end <= cursor {
            continue;
        }
        if span.start > cursor {
            out.push_str(&text[cursor..span.start]);
        }
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out.trim().to_owned()
}
