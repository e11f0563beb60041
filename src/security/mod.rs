//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Captured request:
//!     → headers.rs (drop baseline + configured headers)
//!     → header map attached to the record
//! ```
//!
//! # Design Decisions
//! - Nothing the client controls is trusted: correlation ids are generated
//!   server-side, file keys are checked before they reach a filesystem path

pub mod headers;

pub use headers::{HeaderFilter, BASELINE_EXCLUDED};
