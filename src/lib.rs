//! Request-capture gateway library.
//!
//! Accepts HTTP requests on `/api/rq/http`, normalizes them into records,
//! stores attachments and persists each record before answering.

pub mod config;
pub mod files;
pub mod http;
pub mod ingest;
pub mod lifecycle;
pub mod observability;
pub mod records;
pub mod security;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use ingest::Ingestor;
pub use lifecycle::Shutdown;
