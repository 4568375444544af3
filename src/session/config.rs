// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::prompt::DEFAULT_SYSTEM_PROMPT;

/// Prior turns forwarded with every request.
pub const DEFAULT_HISTORY_WINDOW: usize = 6;
/// Per-attachment character ceiling before truncation.
pub const DEFAULT_ATTACHMENT_CHAR_LIMIT: usize = 12_000;
pub const DEFAULT_ACKNOWLEDGEMENT: &str = "Done. The diagram has been updated.";

/// Tunables for a conversation session. Every field falls back to its default when omitted from
/// a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub history_window: usize,
    pub attachment_char_limit: usize,
    pub acknowledgement: String,
    pub system_prompt: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            attachment_char_limit: DEFAULT_ATTACHMENT_CHAR_LIMIT,
            acknowledgement: DEFAULT_ACKNOWLEDGEMENT.to_owned(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_owned(),
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read config {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "invalid config {path:?}: {source}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::path::Path;

    use super::{ConfigError, SessionConfig, DEFAULT_HISTORY_WINDOW};

    #[test]
    fn partial_config_keeps_defaults() {
        let config = SessionConfig::from_json_str(r#"{ "attachment_char_limit": 50 }"#)
            .expect("config");
        assert_eq!(config.attachment_char_limit, 50);
        assert_eq!(config.history_window, DEFAULT_HISTORY_WINDOW);
        assert!(!config.system_prompt.is_empty());
    }

    #[test]
    fn unknown_shape_is_rejected() {
        assert!(SessionConfig::from_json_str(r#"{ "history_window": "six" }"#).is_err());
    }

    #[test]
    fn load_errors_expose_their_cause() {
        let err = SessionConfig::load(Path::new("/nonexistent/riskflow/config.json"))
            .expect_err("missing config");
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.source().is_some());
    }
}
