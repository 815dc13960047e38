//! Regex interpreter
//!
//! Reads the structured user-turn syntax used by stories and by the
//! `/intent` shortcut:
//!
//! ```text
//! greet
//! /inform{"city": "berlin"}
//! affirm@0.8
//! ```
//!
//! Two entry points share one grammar. [`parse_intent_syntax`] is strict and
//! reports malformed input; [`RegexInterpreter`] is lenient and never fails,
//! which makes it usable as the default interpreter for end-to-end stories.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

use dialogue_import_core::{Entity, IntentPrediction, Interpreter, ParsedMessage};

/// Confidence assigned when the text gives none
pub const DEFAULT_CONFIDENCE: f32 = 1.0;

/// `intent`, optional `@confidence`, optional `{json}`
static INTENT_SYNTAX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/?([^{@]+)(@[0-9.]+)?(\{.+\})?\s*$").unwrap());

static DEFAULT_INTERPRETER: Lazy<Arc<RegexInterpreter>> =
    Lazy::new(|| Arc::new(RegexInterpreter::new()));

/// Shared lenient interpreter
pub fn default_interpreter() -> Arc<RegexInterpreter> {
    Arc::clone(&DEFAULT_INTERPRETER)
}

/// Parse `intent@conf{entities}` syntax, rejecting malformed input
pub fn parse_intent_syntax(text: &str) -> Result<ParsedMessage, String> {
    let trimmed = text.trim();
    let caps = INTENT_SYNTAX
        .captures(trimmed)
        .ok_or_else(|| format!("'{}' is not a valid intent expression", trimmed))?;

    let intent = caps
        .get(1)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("'{}' has an empty intent name", trimmed))?;

    let confidence = match caps.get(2) {
        Some(m) => {
            let raw = &m.as_str()[1..];
            let value: f32 = raw
                .parse()
                .map_err(|_| format!("Invalid confidence '{}' in '{}'", raw, trimmed))?;
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("Confidence {} in '{}' is outside 0..1", value, trimmed));
            }
            value
        }
        None => DEFAULT_CONFIDENCE,
    };

    let entities = match caps.get(3) {
        Some(m) => {
            let parsed: JsonValue = serde_json::from_str(m.as_str())
                .map_err(|e| format!("Invalid entity JSON in '{}': {}", trimmed, e))?;
            match parsed {
                JsonValue::Object(map) => entities_from_map(map),
                _ => return Err(format!("Entities in '{}' must be an object", trimmed)),
            }
        }
        None => Vec::new(),
    };

    Ok(ParsedMessage {
        text: text.to_string(),
        intent: Some(IntentPrediction::new(intent, confidence)),
        entities,
    })
}

/// `{"a": 1, "b": [2, 3]}` becomes entities a=1, b=2, b=3
fn entities_from_map(map: Map<String, JsonValue>) -> Vec<Entity> {
    let mut entities = Vec::new();
    for (name, value) in map {
        match value {
            JsonValue::Array(values) => {
                entities.extend(values.into_iter().map(|v| Entity::new(name.clone(), v)))
            }
            other => entities.push(Entity::new(name, other)),
        }
    }
    entities
}

/// Interpreter that understands only the structured intent syntax
///
/// Text that does not match yields a message with no intent. Entity JSON
/// that fails to parse is dropped with a warning.
#[derive(Debug, Clone, Default)]
pub struct RegexInterpreter;

impl RegexInterpreter {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous form of [`Interpreter::parse`]
    pub fn parse_text(&self, text: &str) -> ParsedMessage {
        match parse_intent_syntax(text) {
            Ok(parsed) => parsed,
            Err(reason) => {
                let trimmed = text.trim();
                match INTENT_SYNTAX.captures(trimmed).and_then(|c| c.get(1)) {
                    // Intent was fine, the annotations were not
                    Some(intent) if !intent.as_str().trim().is_empty() => {
                        tracing::warn!(text = %trimmed, %reason, "Ignoring malformed entities");
                        ParsedMessage {
                            text: text.to_string(),
                            intent: Some(IntentPrediction::new(
                                intent.as_str().trim(),
                                DEFAULT_CONFIDENCE,
                            )),
                            entities: Vec::new(),
                        }
                    }
                    _ => ParsedMessage::text_only(text),
                }
            }
        }
    }
}

#[async_trait]
impl Interpreter for RegexInterpreter {
    async fn parse(&self, text: &str) -> ParsedMessage {
        self.parse_text(text)
    }

    fn name(&self) -> &str {
        "regex"
    }
}
