//! SQLite-backed record store.
//!
//! # Design Decisions
//! - One connection behind a mutex; every call runs on the blocking pool
//!   so the async executor never waits on SQLite
//! - Headers, file keys and payload are stored as JSON text columns
//! - Timestamps are RFC 3339 with nanoseconds so a round trip is exact
//! - The schema is created on open

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use crate::records::record::{Record, RecordStatus};
use crate::records::store::{RecordStore, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS rq_records (
    id           TEXT PRIMARY KEY NOT NULL,
    method       TEXT NOT NULL,
    content_type TEXT NOT NULL,
    url          TEXT NOT NULL,
    headers      TEXT NOT NULL,
    file_keys    TEXT NOT NULL,
    payload      TEXT NOT NULL,
    status       TEXT NOT NULL,
    error        TEXT,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
)";

/// Busy timeout applied to the connection.
const BUSY_TIMEOUT_MS: u64 = 5_000;

/// Record store persisted in a SQLite database.
#[derive(Clone)]
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        tracing::info!(path = %path.display(), "Opened record database");
        Self::with_connection(conn)
    }

    /// A private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(std::time::Duration::from_millis(BUSY_TIMEOUT_MS))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&guard)
        })
        .await?
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn add(&self, record: &Record) -> Result<(), StoreError> {
        let record = record.clone();
        self.with_conn(move |conn| {
            let headers = serde_json::to_string(&record.headers)?;
            let file_keys = serde_json::to_string(&record.file_keys)?;
            let result = conn.execute(
                "INSERT INTO rq_records
                    (id, method, content_type, url, headers, file_keys, payload, status, error, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    record.id,
                    record.method,
                    record.content_type,
                    record.url,
                    headers,
                    file_keys,
                    record.payload,
                    record.status.as_str(),
                    record.error,
                    format_time(&record.created_at),
                    format_time(&record.updated_at),
                ],
            );

            match result {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                    Err(StoreError::Conflict(record.id.clone()))
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn get(&self, id: &str) -> Result<Record, StoreError> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    "SELECT id, method, content_type, url, headers, file_keys, payload, status, error, created_at, updated_at
                     FROM rq_records WHERE id = ?1",
                    params![id],
                    RawRow::from_row,
                )
                .optional()?;

            match row {
                Some(row) => row.into_record(),
                None => Err(StoreError::NotFound(id)),
            }
        })
        .await
    }
}

/// Column values as stored, before decoding.
struct RawRow {
    id: String,
    method: String,
    content_type: String,
    url: String,
    headers: String,
    file_keys: String,
    payload: String,
    status: String,
    error: Option<String>,
    created_at: String,
    updated_at: String,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            method: row.get(1)?,
            content_type: row.get(2)?,
            url: row.get(3)?,
            headers: row.get(4)?,
            file_keys: row.get(5)?,
            payload: row.get(6)?,
            status: row.get(7)?,
            error: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    fn into_record(self) -> Result<Record, StoreError> {
        let corrupt = |reason: String| StoreError::Corrupt {
            id: self.id.clone(),
            reason,
        };

        let status: RecordStatus = self.status.parse().map_err(corrupt)?;
        let created_at = parse_time(&self.created_at).map_err(corrupt)?;
        let updated_at = parse_time(&self.updated_at).map_err(corrupt)?;

        Ok(Record {
            headers: serde_json::from_str(&self.headers)?,
            file_keys: serde_json::from_str(&self.file_keys)?,
            id: self.id,
            method: self.method,
            content_type: self.content_type,
            url: self.url,
            payload: self.payload,
            status,
            error: self.error,
            created_at,
            updated_at,
        })
    }
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_time(text: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("bad timestamp {text:?}: {e}"))
}
