// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Applies one operation to the working graph and returns its log line, or `None` when the
/// operation did not change anything.
fn apply_op(graph: &mut Graph, op: &Op) -> Option<String> {
    match op {
        Op::ClearGraph => {
            // Later operations in the batch start from an empty canvas, even if it already was.
            graph.clear();
            Some("Cleared canvas".to_owned())
        }
        Op::AddNode { node_id, title } => {
            let node_id = graph.add_node(node_id.clone(), title)?;
            let title = graph.node(node_id.as_str())?.title();
            Some(format!("Added: {title}"))
        }
        Op::ConnectNodes {
            source_id,
            target_id,
            label,
        } => {
            let edge_id = graph.connect(source_id.trim(), target_id.trim(), label.as_deref())?;
            let edge = graph.edge(edge_id.as_str())?;
            Some(format!("Connected: {} → {}", edge.source(), edge.target()))
        }
        Op::AddRisk { target_id, name } => {
            graph.add_risk(target_id.trim(), name)?;
            Some(format!("Risk: {}", name.trim()))
        }
        Op::AddControl {
            target_id,
            risk_name,
            name,
        } => {
            graph.add_control(target_id.trim(), risk_name, name)?;
            Some(format!("Control: {}", name.trim()))
        }
    }
}
