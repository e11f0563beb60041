//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (captures, latency, stored files)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `rq_captures_total` (counter): captures by method, status
//!   (methods outside GET/POST/PUT/PATCH share the `OTHER` label)
//! - `rq_capture_duration_seconds` (histogram): pipeline latency by method
//! - `rq_files_stored_total` (counter): attachments written
//! - `rq_file_bytes_total` (counter): attachment bytes written
//!
//! # Design Decisions
//! - Recording is a no-op until `init_metrics` installs an exporter,
//!   so tests and embedders pay nothing

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Label for a request method. Hyper accepts arbitrary extension methods,
/// so anything uncaptured collapses into one series.
pub fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::PATCH => "PATCH",
        _ => "OTHER",
    }
}

/// Record one finished capture request.
pub fn record_capture(method: &Method, status: u16, started: Instant) {
    let method = method_label(method);
    counter!(
        "rq_captures_total",
        "method" => method,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("rq_capture_duration_seconds", "method" => method)
        .record(started.elapsed().as_secs_f64());
}

/// Record one attachment written to the file store.
pub fn record_file_stored(bytes: usize) {
    counter!("rq_files_stored_total").increment(1);
    counter!("rq_file_bytes_total").increment(bytes as u64);
}
