//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the storage backends named by configuration
//! - Compile ingestion settings
//! - Assemble the pipeline the server runs
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::sync::Arc;

use thiserror::Error;

use crate::config::{DatabaseConfig, DatabaseEngine, FileBackend, FilesConfig, GatewayConfig};
use crate::files::{DiskFileStore, FileStore, FileStoreError, InMemoryFileStore};
use crate::ingest::{IngestSettings, Ingestor, SettingsError};
use crate::records::{InMemoryRecordStore, RecordStore, SqliteRecordStore, StoreError};

/// Anything that stops the gateway from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to prepare upload directory: {0}")]
    Files(#[from] FileStoreError),

    #[error("failed to open record store: {0}")]
    Records(#[from] StoreError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Build the file store selected by `files.backend`.
pub async fn build_file_store(config: &FilesConfig) -> Result<Arc<dyn FileStore>, StartupError> {
    let store: Arc<dyn FileStore> = match config.backend {
        FileBackend::Disk => {
            Arc::new(DiskFileStore::new(&config.upload_directory).await?)
        }
        FileBackend::Memory => {
            tracing::warn!("Using in-memory file store; uploads are lost on exit");
            Arc::new(InMemoryFileStore::new())
        }
    };
    Ok(store)
}

/// Build the record store selected by `database.engine`.
pub fn build_record_store(config: &DatabaseConfig) -> Result<Arc<dyn RecordStore>, StartupError> {
    let store: Arc<dyn RecordStore> = match config.engine {
        DatabaseEngine::Sqlite => {
            Arc::new(SqliteRecordStore::open(&config.filepath)?)
        }
        DatabaseEngine::Memory => {
            tracing::warn!("Using in-memory record store; records are lost on exit");
            Arc::new(InMemoryRecordStore::new())
        }
    };
    Ok(store)
}

/// Assemble the ingestion pipeline from a validated configuration.
pub async fn build_ingestor(config: &GatewayConfig) -> Result<Ingestor, StartupError> {
    let settings = IngestSettings::from_config(config)?;
    let files = build_file_store(&config.files).await?;
    let records = build_record_store(&config.database)?;
    Ok(Ingestor::new(settings, records, files))
}
