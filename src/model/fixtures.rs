// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::graph::Graph;
use super::ids::NodeId;

/// The graph every new session starts from: `Start → End`.
pub fn seed_graph() -> Graph {
    let mut graph = Graph::new();
    let start = graph.add_node(Some(NodeId::generated("start".to_owned())), "Start");
    let end = graph.add_node(Some(NodeId::generated("end".to_owned())), "End");
    if let (Some(start), Some(end)) = (start, end) {
        graph.connect(start.as_str(), end.as_str(), None);
    }
    graph
}

#[cfg(test)]
pub(crate) fn order_to_cash() -> Graph {
    let mut graph = Graph::new();
    for (id, title) in [("order", "Receive order"), ("credit", "Credit check"), ("ship", "Ship")] {
        graph.add_node(Some(NodeId::generated(id.to_owned())), title);
    }
    graph.connect("order", "credit", None);
    graph.connect("credit", "ship", Some("approved"));
    graph.add_risk("credit", "Bad debt");
    graph.add_control("credit", "bad debt", "Credit limit review");
    graph
}

#[cfg(test)]
static TEMP_DIR_COUNTER: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

/// Scratch directory removed on drop.
#[cfg(test)]
pub(crate) struct TempDir {
    pub(crate) path: std::path::PathBuf,
}

#[cfg(test)]
impl TempDir {
    pub(crate) fn new(prefix: &str) -> Self {
        use std::sync::atomic::Ordering;
        use std::time::{SystemTime, UNIX_EPOCH};

        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "riskflow-{prefix}-{}-{nanos}-{counter}",
            std::process::id()
        ));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }
}

#[cfg(test)]
impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
