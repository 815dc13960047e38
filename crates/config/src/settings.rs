//! Runtime settings for the importer
//!
//! Settings are layered: built-in defaults, then `config/importer.*`, then
//! `config/importer.{env}.*`, then `DIALOGUE_IMPORT__*` environment
//! variables. Later layers win.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::defaults;
use crate::ConfigError;

/// What to do when an NLU file fails to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NluFailurePolicy {
    /// Abort the NLU load with the parse error
    #[default]
    Fatal,
    /// Drop the file and keep going
    Skip,
}

/// Main importer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Language for NLU data when the caller gives none
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Seed for exclusion sampling of stories
    #[serde(default = "default_exclusion_seed")]
    pub exclusion_seed: u64,

    /// NLU parse failure handling
    #[serde(default)]
    pub nlu_failure_policy: NluFailurePolicy,

    /// Report story intents/actions/slots missing from the domain
    #[serde(default = "default_true")]
    pub check_domain_symbols: bool,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

fn default_language() -> String {
    defaults::LANGUAGE.to_string()
}

fn default_exclusion_seed() -> u64 {
    defaults::EXCLUSION_SEED
}

fn default_true() -> bool {
    true
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            exclusion_seed: default_exclusion_seed(),
            nlu_failure_policy: NluFailurePolicy::default(),
            check_domain_symbols: true,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ImportSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_language.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "default_language".to_string(),
                message: "Language must not be empty".to_string(),
            });
        }

        self.observability.validate()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    defaults::LOG_LEVEL.to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl ObservabilityConfig {
    const LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    fn validate(&self) -> Result<(), ConfigError> {
        let level = self.log_level.to_lowercase();
        if !Self::LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "observability.log_level".to_string(),
                message: format!(
                    "Unknown level '{}', expected one of {:?}",
                    self.log_level,
                    Self::LEVELS
                ),
            });
        }
        Ok(())
    }
}

/// Load settings from `config/` relative to the working directory
pub fn load_settings(env: Option<&str>) -> Result<ImportSettings, ConfigError> {
    load_settings_from("config", env)
}

/// Load settings from an explicit config directory
pub fn load_settings_from(
    config_dir: impl AsRef<Path>,
    env: Option<&str>,
) -> Result<ImportSettings, ConfigError> {
    let config_dir = config_dir.as_ref();
    let mut builder = Config::builder();

    // Load default config
    let base = config_dir.join("importer");
    builder = builder.add_source(File::with_name(&base.to_string_lossy()).required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        let env_file = config_dir.join(format!("importer.{}", env_name));
        builder =
            builder.add_source(File::with_name(&env_file.to_string_lossy()).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix(defaults::ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: ImportSettings = config.try_deserialize()?;

    settings.validate()?;

    tracing::debug!(
        language = %settings.default_language,
        seed = settings.exclusion_seed,
        "Loaded importer settings"
    );

    Ok(settings)
}
