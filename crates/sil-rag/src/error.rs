//! Error types for the RAG assistant

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG system errors
///
/// Every error is scoped to the call that produced it. Ingestion failures abort
/// that single ingestion, query failures abort that single query.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed request (blank query, missing upload field)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A source file could not be read or decoded
    #[error("Failed to load '{}': {message}", .path.display())]
    Load { path: PathBuf, message: String },

    /// Bulk build found nothing to index
    #[error("No loadable documents found in {}", .0.display())]
    EmptyCorpus(PathBuf),

    /// Unsupported file type (only raised when loading is explicitly requested)
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Embedding provider failure
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector index add/persist/search failure
    #[error("Vector index error: {0}")]
    VectorDb(String),

    /// Vector dimensionality does not match the collection
    #[error("Dimension mismatch in collection '{collection}': expected {expected}, got {actual}")]
    DimensionMismatch {
        collection: String,
        expected: usize,
        actual: usize,
    },

    /// Generation provider unreachable, timed out, or returned non-success
    #[error("Generation failed: {0}")]
    Generation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a load error for a path
    pub fn load(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a vector db error
    pub fn vector_db(message: impl Into<String>) -> Self {
        Self::VectorDb(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True for embedding and vector-store failures (the indexing family)
    pub fn is_index_error(&self) -> bool {
        matches!(
            self,
            Self::Embedding(_) | Self::VectorDb(_) | Self::DimensionMismatch { .. }
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            Error::Config(_) => (StatusCode::BAD_REQUEST, "config_error"),
            Error::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            Error::Load { .. } => (StatusCode::BAD_REQUEST, "load_error"),
            Error::EmptyCorpus(_) => (StatusCode::INTERNAL_SERVER_ERROR, "empty_corpus"),
            Error::UnsupportedFileType(_) => (StatusCode::BAD_REQUEST, "unsupported_type"),
            Error::Embedding(_) => (StatusCode::INTERNAL_SERVER_ERROR, "embedding_error"),
            Error::VectorDb(_) => (StatusCode::INTERNAL_SERVER_ERROR, "vector_db_error"),
            Error::DimensionMismatch { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "dimension_mismatch")
            }
            Error::Generation(_) => (StatusCode::BAD_GATEWAY, "generation_error"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Json(_) => (StatusCode::BAD_REQUEST, "json_error"),
            Error::Toml(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
