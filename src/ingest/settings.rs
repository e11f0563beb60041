//! Compiled, immutable settings the pipeline runs with.

use axum::http::header::InvalidHeaderName;
use thiserror::Error;

use crate::config::GatewayConfig;
use crate::files::ExtensionValidator;
use crate::security::HeaderFilter;

/// Error compiling settings from a configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid extension allow-list: {0}")]
    ExtensionPattern(#[from] regex::Error),

    #[error("invalid excluded header name: {0}")]
    HeaderName(#[from] InvalidHeaderName),

    #[error("invalid allowed content type `{0}`")]
    ContentType(String),
}

/// Everything the pipeline needs from configuration, compiled once.
#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub extensions: ExtensionValidator,
    pub headers: HeaderFilter,
    /// Allowed media type essences, lower-case ("application/json").
    pub allowed_media_types: Vec<String>,
    pub multipart_max_memory: usize,
    pub max_body_size: usize,
}

impl IngestSettings {
    pub fn from_config(config: &GatewayConfig) -> Result<Self, SettingsError> {
        let allowed_media_types = config
            .server
            .allowed_content_types
            .iter()
            .map(|ct| {
                ct.parse::<mime::Mime>()
                    .map(|m| m.essence_str().to_ascii_lowercase())
                    .map_err(|_| SettingsError::ContentType(ct.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            extensions: ExtensionValidator::new(&config.files.permitted_extensions)?,
            headers: HeaderFilter::new(&config.server.excluded_headers)?,
            allowed_media_types,
            multipart_max_memory: config.server.multipart_max_memory,
            max_body_size: config.server.max_body_size,
        })
    }

    /// Whether a media type essence is accepted.
    pub fn allows(&self, essence: &str) -> bool {
        self.allowed_media_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(essence))
    }
}
