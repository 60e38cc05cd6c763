//! Uploaded document metadata and user-facing status lines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of one processed document, kept for display in the session sidebar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Filename as uploaded
    pub filename: String,
    /// Page count
    pub pages: u32,
    /// Upload size in bytes
    pub bytes: u64,
    /// sha256 of the raw upload, hex-encoded
    pub content_hash: String,
    /// When the document was processed
    pub processed_at: DateTime<Utc>,
}

/// Severity of a status line shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Warning,
    Error,
}

/// A one-line outcome report rendered above the chat transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub message: String,
}

impl StatusLine {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }
}
