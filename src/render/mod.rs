// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text rendering of graph snapshots.
//!
//! The interactive canvas lives outside this crate; this renderer only backs the terminal
//! front-end and debugging output.

mod text;

pub use text::render_graph_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_positions: bool,
    pub max_label_len: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_positions: true,
            max_label_len: None,
        }
    }
}
