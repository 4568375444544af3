// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Graph ownership and export.
//!
//! The store holds the canonical graph behind immutable snapshots; the export module writes a
//! snapshot out as a JSON document.

pub mod export;
pub mod graph_store;

pub use export::{
    export_json, write_export, ExportDocument, ExportError, DEFAULT_EXPORT_FILENAME,
    EXPORT_VERSION,
};
pub use graph_store::GraphStore;
