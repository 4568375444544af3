// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Riskflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Riskflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! File attachments forwarded to the agent.
//!
//! Text-like files travel as text; everything else is base64-encoded into a data URL so the
//! request stays plain text. Reads are concurrent, and a file that cannot be read is logged and
//! left out without affecting the others.

use std::borrow::Cow;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures_util::future::join_all;
use serde::Serialize;

const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "markdown", "csv", "tsv", "json", "xml", "yaml", "yml", "toml", "html", "htm",
    "css", "js", "ts", "py", "rs", "sql", "log", "ini", "cfg", "mmd",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentEncoding {
    Text,
    Base64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub name: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub size: u64,
    pub content: String,
    pub encoding: AttachmentEncoding,
}

impl Attachment {
    /// Classifies raw file bytes by the extension of `name`.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let extension = Path::new(&name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let media_type = media_type_for(&extension).to_owned();
        let size = bytes.len() as u64;

        let is_text = TEXT_EXTENSIONS.contains(&extension.as_str());
        let (content, encoding) = match String::from_utf8(bytes) {
            Ok(text) if is_text => (text, AttachmentEncoding::Text),
            Ok(text) => (encode_data_url(&media_type, text.as_bytes()), AttachmentEncoding::Base64),
            Err(err) => (encode_data_url(&media_type, err.as_bytes()), AttachmentEncoding::Base64),
        };

        Self {
            name,
            media_type,
            size,
            content,
            encoding,
        }
    }

    /// Content cut to at most `limit` characters, with a marker appended when anything was cut.
    pub fn excerpt(&self, limit: usize) -> Cow<'_, str> {
        let total = self.content.chars().count();
        if total <= limit {
            return Cow::Borrowed(&self.content);
        }
        let mut out: String = self.content.chars().take(limit).collect();
        out.push_str(&format!(
            "\n[truncated: showing first {limit} of {total} characters]"
        ));
        Cow::Owned(out)
    }
}

fn encode_data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{media_type};base64,{}", STANDARD.encode(bytes))
}

fn media_type_for(extension: &str) -> &'static str {
    match extension {
        "txt" | "log" | "ini" | "cfg" | "mmd" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "tsv" => "text/tab-separated-values",
        "json" => "application/json",
        "xml" => "application/xml",
        "yaml" | "yml" => "application/yaml",
        "toml" => "application/toml",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "ts" => "text/x-typescript",
        "py" => "text/x-python",
        "rs" => "text/x-rust",
        "sql" => "application/sql",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

#[derive(Debug)]
pub enum AttachmentError {
    Io { path: PathBuf, source: io::Error },
    NotAFile { path: PathBuf },
}

impl fmt::Display for AttachmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read attachment {path:?}: {source}"),
            Self::NotAFile { path } => write!(f, "attachment {path:?} is not a regular file"),
        }
    }
}

impl std::error::Error for AttachmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::NotAFile { .. } => None,
        }
    }
}

pub async fn read_attachment(path: &Path) -> Result<Attachment, AttachmentError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|source| AttachmentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(AttachmentError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    let bytes = tokio::fs::read(path).await.map_err(|source| AttachmentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Attachment::from_bytes(name, bytes))
}

/// Reads every path concurrently and keeps the ones that succeeded, in input order.
pub async fn read_attachments(paths: &[PathBuf]) -> Vec<Attachment> {
    let results = join_all(paths.iter().map(|path| read_attachment(path))).await;
    results
        .into_iter()
        .filter_map(|result| match result {
            Ok(attachment) => Some(attachment),
            Err(err) => {
                tracing::warn!(error = %err, "dropping attachment");
                None
            }
        })
        .collect()
}
