// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Riskflow: a process-risk diagram editor driven by direct edits and agent tool calls.
//!
//! The graph lives in [`store::GraphStore`]; agent replies are normalized by [`decode`] and
//! applied as one batch by [`ops`]; [`session::ConversationSession`] ties both to a transport.

pub mod decode;
pub mod model;
pub mod ops;
pub mod render;
pub mod session;
pub mod store;
pub mod telemetry;
