//! Response bodies for the capture endpoint.
//!
//! # Responsibilities
//! - Render a stored record as the canonical JSON response
//! - Map every `IngestError` to its status and an `{"error": ...}` body
//!
//! # Design Decisions
//! - Only the error's message reaches the caller; internal sources stay in logs
//! - Timeouts answer 408 with the same error body shape
//! - The correlation header is added by the middleware, not here

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::ingest::IngestError;
use crate::records::Record;

/// Success body: the correlation id plus the record as stored.
#[derive(Debug, Serialize, Deserialize)]
pub struct RqResponse {
    pub id: String,
    pub record: Record,
}

impl From<Record> for RqResponse {
    fn from(record: Record) -> Self {
        Self {
            id: record.id.clone(),
            record,
        }
    }
}

impl IntoResponse for RqResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Give the timeout layer's bare 408 the same `{"error": ...}` body as
/// every other failure. The capture handler never answers 408 itself.
pub async fn timeout_error_body(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    let body = ErrorResponse {
        error: "request timed out".to_string(),
    };
    (StatusCode::REQUEST_TIMEOUT, Json(body)).into_response()
}
