//! Correlation identity for inbound requests.
//!
//! # Responsibilities
//! - Generate a fresh correlation id (UUID v4) for every request
//! - Open the per-request tracing span carrying it
//! - Hand it to the handler, which passes it explicitly into the pipeline
//! - Echo it to the client in the `RqId` response header
//!
//! # Design Decisions
//! - Ids are generated server-side only; an inbound `RqId` header is ignored
//! - Added as early as possible so every log line of the request carries it
//! - The body is never touched here

use std::fmt;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::observability::spans::request_span;

/// Response header carrying the correlation id.
pub const RQ_ID_HEADER: HeaderName = HeaderName::from_static("rqid");

/// Request-scoped correlation identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// A new, globally unique id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CorrelationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Assigns a correlation id before any handler runs.
pub async fn correlation_middleware(mut request: Request<Body>, next: Next) -> Response {
    let rq_id = CorrelationId::generate();
    let span = request_span(&rq_id, request.method(), request.uri().path());

    request.extensions_mut().insert(rq_id.clone());

    let mut response = async move {
        tracing::debug!("Processing request");
        next.run(request).await
    }
    .instrument(span)
    .await;

    match HeaderValue::from_str(rq_id.as_str()) {
        Ok(value) => {
            response.headers_mut().insert(RQ_ID_HEADER, value);
        }
        Err(e) => tracing::error!(rq_id = %rq_id, error = %e, "Correlation id is not a valid header value"),
    }

    response
}
