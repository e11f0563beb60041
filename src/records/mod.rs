//! Capture records and their persistence.
//!
//! # Data Flow
//! ```text
//! ingest pipeline builds Record
//!     → store.rs (RecordStore contract)
//!         → sqlite.rs (durable, default)
//!         → InMemoryRecordStore (tests, throwaway runs)
//! ```
//!
//! # Design Decisions
//! - A record is written exactly once; there is no update path yet
//! - The backend is picked at startup from `database.engine`

pub mod record;
pub mod sqlite;
pub mod store;

pub use record::{MultiMap, Record, RecordStatus};
pub use sqlite::SqliteRecordStore;
pub use store::{InMemoryRecordStore, RecordStore, StoreError};
