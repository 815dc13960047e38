//! Configuration management for the training-data importer
//!
//! Supports loading:
//! - Import config files (YAML/JSON/TOML pipeline and policy mappings)
//! - Runtime settings from layered files and environment variables
//!   (DIALOGUE_IMPORT_ prefix)
//! - Dialogue domain descriptions (intents, actions, slots, responses)
//!
//! # Domain Loading
//!
//! Domain loading never fails an import session. `DomainLoader` returns a
//! `LoadOutcome` that is either the loaded domain or an empty fallback with
//! the reason it was used.

pub mod constants;
pub mod domain;
pub mod import_config;
pub mod settings;

pub use domain::{
    Domain, DomainLoader, DomainValidator, IntentProperties, ResponseVariant, SlotDefinition,
    SlotType, ValidationCategory, ValidationError, ValidationResult, ValidationSeverity,
};
pub use import_config::ImportConfig;
pub use settings::{load_settings, ImportSettings, NluFailurePolicy, ObservabilityConfig};

use dialogue_import_core::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for ImportError {
    fn from(err: ConfigError) -> Self {
        ImportError::Config(err.to_string())
    }
}
