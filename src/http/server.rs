//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the capture handler
//! - Wire up middleware (tracing, correlation id, timeout)
//! - Bind server to listener and serve until shutdown
//! - Record per-request metrics

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::Request,
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Extension, Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::http::request::{correlation_middleware, CorrelationId};
use crate::http::response::{timeout_error_body, RqResponse};
use crate::ingest::{IngestError, Ingestor};
use crate::observability::metrics;

/// Path the gateway captures requests on.
pub const CAPTURE_PATH: &str = "/api/rq/http";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub ingestor: Arc<Ingestor>,
}

/// HTTP server for the capture gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &GatewayConfig, ingestor: Arc<Ingestor>) -> Self {
        let state = AppState { ingestor };
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        // The pipeline bounds each body kind itself; this only lifts the
        // extractor default so multipart can use its own, larger bound.
        let body_limit = config
            .server
            .multipart_max_memory
            .max(config.server.max_body_size);

        Router::new()
            .route(CAPTURE_PATH, any(capture_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::max(body_limit))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(middleware::from_fn(correlation_middleware))
                    .layer(middleware::map_response(timeout_error_body))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The fully layered router, for serving or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Capture handler: every method on the capture path lands here.
async fn capture_handler(
    State(state): State<AppState>,
    Extension(rq_id): Extension<CorrelationId>,
    request: Request<Body>,
) -> Response {
    let started = Instant::now();
    let method = request.method().clone();

    let response = match state.ingestor.ingest(&rq_id, request).await {
        Ok(record) => RqResponse::from(record).into_response(),
        Err(e) => {
            match &e {
                IngestError::BadRequest(reason) => tracing::info!(reason = %reason, "Rejected request"),
                IngestError::Internal { source, .. } => {
                    tracing::error!(error = %e, source = ?source, "Capture failed")
                }
                IngestError::NotImplemented => tracing::warn!(method = %method, "Method not captured"),
            }
            e.into_response()
        }
    };

    metrics::record_capture(&method, response.status().as_u16(), started);
    response
}
