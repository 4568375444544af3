// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write;

use crate::model::Graph;

use super::RenderOptions;

pub(crate) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    let len = text_len(text);
    if len <= max_len {
        return text.to_owned();
    }

    if max_len == 1 {
        return "…".to_owned();
    }

    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

pub(crate) fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Renders a snapshot as an indented outline: nodes with their risks (`!`) and controls (`+`),
/// then edges.
pub fn render_graph_text(graph: &Graph, options: &RenderOptions) -> String {
    if graph.is_empty() {
        return "(empty canvas)".to_owned();
    }

    let clip = |text: &str| match options.max_label_len {
        Some(max) => truncate_with_ellipsis(text, max),
        None => text.to_owned(),
    };

    let mut out = String::new();
    let _ = writeln!(out, "Nodes ({})", graph.nodes().len());
    for node in graph.nodes() {
        let _ = write!(out, "  [{}] {}", node.id(), clip(node.title()));
        if options.show_positions {
            let position = node.position();
            let _ = write!(out, " @ ({}, {})", position.x, position.y);
        }
        out.push('\n');
        for risk in node.risks() {
            let _ = writeln!(out, "    ! {}", clip(risk.name()));
            for control in risk.controls() {
                let _ = writeln!(out, "      + {}", clip(control.name()));
            }
        }
    }

    let _ = writeln!(out, "Edges ({})", graph.edges().len());
    for edge in graph.edges() {
        let _ = write!(out, "  {} → {}", edge.source(), edge.target());
        if let Some(label) = edge.label() {
            let _ = write!(out, "  \"{}\"", clip(label));
        }
        out.push('\n');
    }

    out.trim_end().to_owned()
}
