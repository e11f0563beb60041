//! Error taxonomy for the ingestion pipeline.

use axum::http::StatusCode;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every failure that leaves the pipeline.
///
/// The `Display` text is what the caller sees; `Internal` sources are only
/// logged.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The caller sent something unusable.
    #[error("{0}")]
    BadRequest(String),

    /// Storage or another server-side step failed.
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The HTTP method is not captured.
    #[error("Not Implemented")]
    NotImplemented,
}

impl IngestError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        IngestError::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        IngestError::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// HTTP status for this error class.
    pub fn status(&self) -> StatusCode {
        match self {
            IngestError::BadRequest(_) => StatusCode::BAD_REQUEST,
            IngestError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            IngestError::NotImplemented => StatusCode::NOT_IMPLEMENTED,
        }
    }
}
