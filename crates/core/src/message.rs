//! Parsed user message types
//!
//! Produced by interpreters and consumed by the story reader and NLU parsers.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// An entity annotation or extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity type (e.g. "city")
    pub entity: String,
    /// Extracted or normalised value
    pub value: JsonValue,
    /// Character offset where the entity starts in the message text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    /// Character offset one past the entity end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl Entity {
    /// Entity without position information
    pub fn new(entity: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            entity: entity.into(),
            value: value.into(),
            start: None,
            end: None,
        }
    }

    /// Entity spanning `start..end` in the message text
    pub fn spanning(
        entity: impl Into<String>,
        value: impl Into<JsonValue>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            entity: entity.into(),
            value: value.into(),
            start: Some(start),
            end: Some(end),
        }
    }

    /// Value rendered as plain text (strings unquoted)
    pub fn value_text(&self) -> String {
        match &self.value {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Intent prediction with confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentPrediction {
    pub name: String,
    pub confidence: f32,
}

impl IntentPrediction {
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// Result of interpreting a user message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// Original text
    pub text: String,
    /// Predicted intent, if any
    #[serde(default)]
    pub intent: Option<IntentPrediction>,
    /// Extracted entities
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl ParsedMessage {
    /// Message with no intent or entities
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            intent: None,
            entities: Vec::new(),
        }
    }

    pub fn intent_name(&self) -> Option<&str> {
        self.intent.as_ref().map(|i| i.name.as_str())
    }
}
