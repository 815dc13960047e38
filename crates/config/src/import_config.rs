//! Import configuration file
//!
//! The pipeline/policy mapping handed to trainers. Read once when an
//! importer is constructed; a missing file is an empty mapping.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::path::Path;

use crate::constants::config_keys;
use crate::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportConfig {
    values: Map<String, JsonValue>,
}

impl ImportConfig {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_map(values: Map<String, JsonValue>) -> Self {
        Self { values }
    }

    /// Load from an optional path
    ///
    /// No path, or a path that does not exist, yields an empty mapping. An
    /// existing file that cannot be read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::read(path),
            Some(path) => {
                tracing::debug!(path = %path.display(), "Config file does not exist, using empty config");
                Ok(Self::empty())
            }
            None => Ok(Self::empty()),
        }
    }

    /// Read a YAML, JSON or TOML config file
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::ParseError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Ok(Self::empty());
        }

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let value: JsonValue = match extension {
            "toml" => toml::from_str(&content).map_err(|e| {
                ConfigError::ParseError(format!("Failed to parse {}: {}", path.display(), e))
            })?,
            // YAML is a superset of JSON
            _ => serde_yaml::from_str(&content).map_err(|e| {
                ConfigError::ParseError(format!("Failed to parse {}: {}", path.display(), e))
            })?,
        };

        match value {
            JsonValue::Object(values) => {
                tracing::debug!(path = %path.display(), keys = values.len(), "Loaded import config");
                Ok(Self { values })
            }
            // A document holding only comments
            JsonValue::Null => Ok(Self::empty()),
            other => Err(ConfigError::InvalidValue {
                field: path.display().to_string(),
                message: format!("Config must be a mapping, found {}", json_type(&other)),
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: JsonValue) -> Option<JsonValue> {
        self.values.insert(key.into(), value)
    }

    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.values
    }

    /// Configured language, if any
    pub fn language(&self) -> Option<&str> {
        self.get(config_keys::LANGUAGE).and_then(|v| v.as_str())
    }

    /// NLU pipeline components
    pub fn pipeline(&self) -> &[JsonValue] {
        self.list(config_keys::PIPELINE)
    }

    /// Dialogue policies
    pub fn policies(&self) -> &[JsonValue] {
        self.list(config_keys::POLICIES)
    }

    /// Importer entries
    pub fn importers(&self) -> &[JsonValue] {
        self.list(config_keys::IMPORTERS)
    }

    fn list(&self, key: &str) -> &[JsonValue] {
        self.get(key)
            .and_then(|v| v.as_array())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Shallow merge; keys in `other` replace keys in `self`
    pub fn merge(mut self, other: ImportConfig) -> Self {
        for (key, value) in other.values {
            self.values.insert(key, value);
        }
        self
    }
}

fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "a mapping",
    }
}
