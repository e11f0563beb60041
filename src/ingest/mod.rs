//! Ingestion subsystem: turns one inbound request into one stored record.
//!
//! # Data Flow
//! ```text
//! Request + CorrelationId
//!     → pipeline.rs (method, then media type)
//!         GET        → query string payload
//!         urlencoded → form payload
//!         multipart  → form payload + validated, stored files
//!         JSON       → raw body payload
//!     → header filter
//!     → record store
//! ```

pub mod error;
pub mod form;
pub mod pipeline;
pub mod settings;

pub use error::IngestError;
pub use pipeline::Ingestor;
pub use settings::{IngestSettings, SettingsError};
