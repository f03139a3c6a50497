//! Error types for ingestion and the OCR bridge.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by extraction and ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    /// File extension is neither a supported single-file type nor a zip archive
    #[error("{0} is not a valid type")]
    UnsupportedFormat(String),

    /// Content could not be turned into text
    #[error("failed to extract '{file}': {message}")]
    Extraction { file: String, message: String },

    /// `overlap >= chunk_size`, or a zero chunk size
    #[error("invalid chunking parameters: overlap ({overlap}) must be smaller than chunk_size ({chunk_size})")]
    InvalidParameters { chunk_size: usize, overlap: usize },

    /// Malformed HTTP request (missing upload field, bad multipart body)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Object store listing or download failure
    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),
}

impl IngestError {
    /// Create an extraction error for the given file.
    pub fn extraction(file: impl Into<String>, message: impl ToString) -> Self {
        Self::Extraction {
            file: file.into(),
            message: message.to_string(),
        }
    }
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            IngestError::UnsupportedFormat(_) => (StatusCode::BAD_REQUEST, "unsupported_type"),
            IngestError::Extraction { .. } => (StatusCode::BAD_REQUEST, "extraction_error"),
            IngestError::InvalidParameters { .. } => (StatusCode::BAD_REQUEST, "invalid_parameters"),
            IngestError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            IngestError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            IngestError::ObjectStore(_) => (StatusCode::BAD_GATEWAY, "object_store_error"),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Failures anywhere in the OCR round-trip.
///
/// These never escape the PDF path; they trigger the legacy extractor.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR credentials unavailable: {0}")]
    MissingCredentials(String),

    #[error("OCR submission failed: {0}")]
    Submission(String),

    #[error("OCR result not ready after {attempts} attempts")]
    PollingExhausted { attempts: u32 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed OCR archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("recovered text not found at {0}")]
    MissingResult(PathBuf),

    #[error("OCR returned no text")]
    EmptyResult,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
