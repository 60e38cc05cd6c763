//! Error types for the document chat pipeline

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for docchat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Document chat errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A PDF could not be opened at all. Page-level failures inside a
    /// readable document degrade to empty text instead of raising this.
    #[error("Failed to extract '{filename}': {message}")]
    Extraction { filename: String, message: String },

    /// Chunking produced nothing to index
    #[error("Cannot build an index from an empty corpus")]
    EmptyCorpus,

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Chat-completion call failed; conversation history is untouched
    #[error("Answer generation failed: {0}")]
    Generation(String),

    /// Question asked before any document set was processed
    #[error("No documents have been processed yet")]
    NoDocuments,

    /// Empty or whitespace-only question
    #[error("Question is empty")]
    InvalidQuestion,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an extraction error for one document
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::Extraction { filename, message } => (
                StatusCode::BAD_REQUEST,
                "extraction_error",
                format!("Failed to extract '{}': {}", filename, message),
            ),
            Error::EmptyCorpus => (
                StatusCode::BAD_REQUEST,
                "empty_corpus",
                self.to_string(),
            ),
            Error::Embedding(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "embedding_error", msg.clone())
            }
            Error::Generation(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "generation_error", msg.clone())
            }
            Error::NoDocuments => (StatusCode::BAD_REQUEST, "no_documents", self.to_string()),
            Error::InvalidQuestion => {
                (StatusCode::BAD_REQUEST, "invalid_question", self.to_string())
            }
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
