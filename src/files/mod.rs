//! Attachment handling subsystem.
//!
//! # Data Flow
//! ```text
//! multipart file part
//!     → extension.rs (allow-list check, normalized extension)
//!     → storage key "{rq_id}-{field}.{ext}"
//!     → store.rs (disk or in-memory FileStore)
//! ```

pub mod extension;
pub mod store;

pub use extension::{ExtensionCheck, ExtensionValidator};
pub use store::{DiskFileStore, FileStore, FileStoreError, InMemoryFileStore};
