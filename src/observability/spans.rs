//! Per-request tracing spans.
//!
//! # Responsibilities
//! - Create the span every log line of a captured request is recorded in
//!
//! # Design Decisions
//! - The correlation id is a span field, so handlers and stores don't
//!   have to repeat it on every event

use axum::http::Method;
use tracing::Span;

use crate::http::request::CorrelationId;

/// Span wrapping one inbound request.
pub fn request_span(rq_id: &CorrelationId, method: &Method, path: &str) -> Span {
    tracing::info_span!("capture", rq_id = %rq_id, method = %method, path = %path)
}
