//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the capture gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Ingestion settings (content types, headers, body bounds).
    pub server: ServerConfig,

    /// Attachment storage and extension policy.
    pub files: FilesConfig,

    /// Record store connection parameters.
    pub database: DatabaseConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Request ingestion settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Header names dropped before a record is stored.
    /// The baseline (Content-Length, User-Agent, Content-Type, Accept) is always added.
    pub excluded_headers: Vec<String>,

    /// Media types accepted on POST/PUT/PATCH.
    pub allowed_content_types: Vec<String>,

    /// Upper bound in bytes for a buffered multipart body.
    pub multipart_max_memory: usize,

    /// Upper bound in bytes for urlencoded and JSON bodies.
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            excluded_headers: Vec::new(),
            allowed_content_types: vec![
                "application/json".to_string(),
                "application/x-www-form-urlencoded".to_string(),
                "multipart/form-data".to_string(),
            ],
            multipart_max_memory: 32 * 1024 * 1024, // 32MB
            max_body_size: 2 * 1024 * 1024,         // 2MB
        }
    }
}

/// Which [`FileStore`](crate::files::FileStore) implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FileBackend {
    /// Files written under `upload_directory`.
    #[default]
    Disk,
    /// Files kept in process memory.
    Memory,
}

/// Attachment storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Storage backend for attachments.
    pub backend: FileBackend,

    /// Directory for the disk backend.
    pub upload_directory: String,

    /// Pipe-separated, case-insensitive extension allow-list (e.g. "mp4|jpg").
    pub permitted_extensions: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            backend: FileBackend::Disk,
            upload_directory: "./uploads".to_string(),
            permitted_extensions: "mp4|jpg".to_string(),
        }
    }
}

/// Which [`RecordStore`](crate::records::RecordStore) implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseEngine {
    #[default]
    Sqlite,
    Memory,
}

/// Record store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Storage engine.
    pub engine: DatabaseEngine,

    /// SQLite database file.
    pub filepath: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            engine: DatabaseEngine::Sqlite,
            filepath: "rq.db".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
