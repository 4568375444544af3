// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A graph holds process-step nodes, each carrying an ordered risk/control tree, plus directed
//! edges between nodes.

pub(crate) mod fixtures;
pub mod graph;
pub mod ids;

pub use fixtures::seed_graph;
pub use graph::{
    Control, ControlDraft, Edge, Graph, Node, NodeEdit, Position, Risk, RiskDraft, SLOT_COLUMNS,
};
pub use ids::{ControlId, EdgeId, Id, IdError, NodeId, RiskId};
