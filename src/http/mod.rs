//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace + timeout layers)
//!     → request.rs (correlation id, request span)
//!     → ingest pipeline (classify, store)
//!     → response.rs (record or error body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{correlation_middleware, CorrelationId, RQ_ID_HEADER};
pub use response::{ErrorResponse, RqResponse};
pub use server::{AppState, HttpServer, CAPTURE_PATH};
