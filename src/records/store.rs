//! Record persistence contract and the in-memory implementation.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;

use crate::records::record::Record;

/// Error type for record persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no record found: {0}")]
    NotFound(String),

    #[error("record already exists: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("record encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("database connection lock poisoned")]
    Poisoned,

    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Persists and retrieves records by id.
///
/// Implementations must accept concurrent calls from independent requests.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record.
    async fn add(&self, record: &Record) -> Result<(), StoreError>;

    /// Fetch a record by id.
    async fn get(&self, id: &str) -> Result<Record, StoreError>;
}

/// Record store backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: DashMap<String, Record>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn add(&self, record: &Record) -> Result<(), StoreError> {
        match self.records.entry(record.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(record.id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Record, StoreError> {
        self.records
            .get(id)
            .map(|r| r.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
