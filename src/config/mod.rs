//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, one table per profile)
//!     → loader.rs (parse, select profile)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → passed by reference into each component's constructor
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    DatabaseConfig, DatabaseEngine, FileBackend, FilesConfig, GatewayConfig, ListenerConfig,
    ObservabilityConfig, ServerConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
