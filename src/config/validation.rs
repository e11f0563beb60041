//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, body bounds > 0)
//! - Check that every configured content type, header name and
//!   extension pattern can actually be compiled by the ingestion pipeline
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::schema::{DatabaseEngine, FileBackend, GatewayConfig};
use crate::files::ExtensionValidator;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),

    #[error("files.permitted_extensions is empty")]
    EmptyExtensionPattern,

    #[error("files.permitted_extensions is invalid: {0}")]
    ExtensionPattern(String),

    #[error("files.upload_directory must be set for the disk backend")]
    EmptyUploadDirectory,

    #[error("server.allowed_content_types is empty")]
    NoContentTypes,

    #[error("server.allowed_content_types entry `{0}` is not a media type")]
    ContentType(String),

    #[error("server.excluded_headers entry `{0}` is not a header name")]
    HeaderName(String),

    #[error("server.{0} must be greater than zero")]
    ZeroLimit(&'static str),

    #[error("database.filepath must be set for the sqlite engine")]
    EmptyDatabasePath,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let pattern = &config.files.permitted_extensions;
    if pattern.split('|').all(|ext| ext.trim().is_empty()) {
        errors.push(ValidationError::EmptyExtensionPattern);
    } else if let Err(e) = ExtensionValidator::new(pattern) {
        errors.push(ValidationError::ExtensionPattern(e.to_string()));
    }

    if config.files.backend == FileBackend::Disk && config.files.upload_directory.trim().is_empty() {
        errors.push(ValidationError::EmptyUploadDirectory);
    }

    if config.server.allowed_content_types.is_empty() {
        errors.push(ValidationError::NoContentTypes);
    }
    for content_type in &config.server.allowed_content_types {
        if content_type.parse::<mime::Mime>().is_err() {
            errors.push(ValidationError::ContentType(content_type.clone()));
        }
    }

    for name in &config.server.excluded_headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError::HeaderName(name.clone()));
        }
    }

    if config.server.multipart_max_memory == 0 {
        errors.push(ValidationError::ZeroLimit("multipart_max_memory"));
    }
    if config.server.max_body_size == 0 {
        errors.push(ValidationError::ZeroLimit("max_body_size"));
    }

    if config.database.engine == DatabaseEngine::Sqlite && config.database.filepath.trim().is_empty() {
        errors.push(ValidationError::EmptyDatabasePath);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
