//! Attachment storage backends.
//!
//! # Responsibilities
//! - Persist attachment bytes under a caller-chosen key
//! - Refuse to overwrite a key that was already used
//!
//! # Design Decisions
//! - Write-only contract: the gateway never reads an attachment back
//! - Keys are flat names; anything that could escape the upload
//!   directory is rejected before touching the filesystem

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use axum::body::Bytes;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Error type for attachment storage.
#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("file {0} already exists")]
    AlreadyExists(String),

    #[error("invalid file key: {0:?}")]
    InvalidKey(String),

    #[error("file IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A repository capable of accepting a file and saving it.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Save `contents` under `key`. Fails if `key` was used before.
    async fn save(&self, key: &str, contents: Bytes) -> Result<(), FileStoreError>;
}

/// Reject keys that are empty or could address anything outside a flat namespace.
pub fn check_key(key: &str) -> Result<(), FileStoreError> {
    let unsafe_key = key.is_empty()
        || key == "."
        || key.contains("..")
        || key.contains(['/', '\\', '\0']);
    if unsafe_key {
        return Err(FileStoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Durable storage: one file per key inside an upload directory.
#[derive(Debug, Clone)]
pub struct DiskFileStore {
    root: PathBuf,
}

impl DiskFileStore {
    /// Use `root` as the upload directory, creating it if needed.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        tracing::info!(path = %root.display(), "Upload directory ready");
        Ok(Self { root })
    }

    /// The upload directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl FileStore for DiskFileStore {
    async fn save(&self, key: &str, contents: Bytes) -> Result<(), FileStoreError> {
        check_key(key)?;
        let path = self.root.join(key);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => FileStoreError::AlreadyExists(key.to_string()),
                _ => FileStoreError::Io(e),
            })?;

        file.write_all(&contents).await?;
        file.sync_all().await?;

        tracing::debug!(path = %path.display(), bytes = contents.len(), "File written");
        Ok(())
    }
}

/// Transient storage for tests and throwaway deployments.
#[derive(Debug, Default)]
pub struct InMemoryFileStore {
    files: DashMap<String, Bytes>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.files.get(key).map(|r| r.value().clone())
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.files.iter().map(|r| r.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn save(&self, key: &str, contents: Bytes) -> Result<(), FileStoreError> {
        check_key(key)?;
        match self.files.entry(key.to_string()) {
            Entry::Occupied(_) => Err(FileStoreError::AlreadyExists(key.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(contents);
                Ok(())
            }
        }
    }
}
