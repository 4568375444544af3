// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Snapshot export.
//!
//! The export is a pretty-printed JSON document holding nodes (with their risk/control trees and
//! positions) and edges. There is no import counterpart.

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::model::{Edge, Graph, Node};

pub const EXPORT_VERSION: u32 = 1;
pub const DEFAULT_EXPORT_FILENAME: &str = "riskflow-export.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: u32,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl ExportDocument {
    pub fn from_graph(graph: &Graph) -> Self {
        Self {
            version: EXPORT_VERSION,
            nodes: graph.nodes().to_vec(),
            edges: graph.edges().to_vec(),
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    Json { source: serde_json::Error },
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json { source } => write!(f, "cannot serialize export: {source}"),
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json { source } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

pub fn export_json(graph: &Graph) -> Result<String, ExportError> {
    let mut text = serde_json::to_string_pretty(&ExportDocument::from_graph(graph))
        .map_err(|source| ExportError::Json { source })?;
    text.push('\n');
    Ok(text)
}

/// Writes the export next to `path` under a temporary name and renames it into place, so an
/// interrupted write never leaves a truncated document behind.
pub fn write_export(path: &Path, graph: &Graph) -> Result<(), ExportError> {
    let text = export_json(graph)?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let Some(file_name) = path.file_name() else {
        return Err(ExportError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".riskflow.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| ExportError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    file.write_all(text.as_bytes()).map_err(|source| ExportError::Io {
        path: tmp_path.clone(),
        source,
    })?;
    drop(file);

    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(ExportError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    tracing::info!(path = %path.display(), "exported graph snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::{export_json, write_export, ExportDocument, EXPORT_VERSION};
    use crate::model::fixtures::{self, TempDir};


    #[test]
    fn export_contains_tree_and_omits_internal_counter() {
        let graph = fixtures::order_to_cash();
        let text = export_json(&graph).expect("export");
        let value: Value = serde_json::from_str(&text).expect("json");

        assert_eq!(value["version"], EXPORT_VERSION);
        assert_eq!(value["nodes"].as_array().expect("nodes").len(), 3);
        assert_eq!(value["edges"].as_array().expect("edges").len(), 2);
        assert_eq!(value["nodes"][1]["risks"][0]["name"], "Bad debt");
        assert_eq!(value["nodes"][1]["risks"][0]["controls"][0]["name"], "Credit limit review");
        assert_eq!(value["edges"][1]["label"], "approved");
        assert!(value["edges"][0].get("label").is_none());
        assert!(value.get("next_seq").is_none());
        assert!(value["nodes"][0]["position"].is_object());
    }

    #[test]
    fn write_export_replaces_existing_file() {
        let tmp = TempDir::new("export");
        let path = tmp.path.join("diagram.json");
        std::fs::write(&path, "stale").unwrap();

        let graph = fixtures::order_to_cash();
        write_export(&path, &graph).expect("write");

        let text = std::fs::read_to_string(&path).unwrap();
        let doc: ExportDocument = serde_json::from_str(&text).expect("document");
        assert_eq!(doc, ExportDocument::from_graph(&graph));

        let leftovers = std::fs::read_dir(&tmp.path)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(".riskflow.tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn write_export_reports_missing_directory() {
        let tmp = TempDir::new("export-missing");
        let path = tmp.path.join("nope").join("diagram.json");
        let err = write_export(&path, &fixtures::order_to_cash()).unwrap_err();
        assert!(err.to_string().contains("io error"));
    }
}
