//! Inline entity annotations
//!
//! Markdown training examples mark entities inline:
//!
//! ```text
//! fly to [Berlin](city)
//! fly to [NYC](city:new york)
//! fly to [Paris]{"entity": "city", "value": "paris"}
//! ```
//!
//! Offsets are character (not byte) positions in the plain text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value as JsonValue;

use dialogue_import_core::Entity;

static ENTITY_ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\[(?P<text>[^\]]+)\](?:\((?P<entity>[^:)]+)(?::(?P<value>[^)]+))?\)|(?P<dict>\{[^}]+\}))",
    )
    .unwrap()
});

/// Example text with annotations removed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotatedText {
    pub text: String,
    pub entities: Vec<Entity>,
    /// (surface text, canonical value) pairs where they differ
    pub synonyms: Vec<(String, String)>,
}

impl AnnotatedText {
    pub fn has_entities(&self) -> bool {
        !self.entities.is_empty()
    }
}

/// Strip annotations from `input`, collecting entities and synonyms
pub fn parse_annotated(input: &str) -> Result<AnnotatedText, String> {
    let mut result = AnnotatedText::default();
    let mut last = 0;
    let mut char_offset = 0;

    for caps in ENTITY_ANNOTATION.captures_iter(input) {
        let whole = caps.get(0).ok_or("annotation without a match")?;
        let before = &input[last..whole.start()];
        result.text.push_str(before);
        char_offset += before.chars().count();

        let surface = caps.name("text").map(|m| m.as_str()).unwrap_or_default();
        let start = char_offset;
        let end = start + surface.chars().count();
        result.text.push_str(surface);
        char_offset = end;
        last = whole.end();

        let (entity, value) = annotation_target(&caps, surface)?;
        if let JsonValue::String(canonical) = &value {
            if canonical != surface {
                result.synonyms.push((surface.to_string(), canonical.clone()));
            }
        }
        result.entities.push(Entity::spanning(entity, value, start, end));
    }

    result.text.push_str(&input[last..]);
    Ok(result)
}

fn annotation_target(caps: &Captures<'_>, surface: &str) -> Result<(String, JsonValue), String> {
    if let Some(entity) = caps.name("entity") {
        let value = caps
            .name("value")
            .map(|v| v.as_str().trim())
            .unwrap_or(surface);
        return Ok((entity.as_str().trim().to_string(), JsonValue::from(value)));
    }

    let raw = caps.name("dict").map(|m| m.as_str()).unwrap_or("{}");
    let dict: JsonValue = serde_json::from_str(raw)
        .map_err(|e| format!("Invalid entity annotation {}: {}", raw, e))?;
    let entity = dict
        .get("entity")
        .and_then(|e| e.as_str())
        .ok_or_else(|| format!("Entity annotation {} has no 'entity' key", raw))?;
    let value = dict
        .get("value")
        .cloned()
        .unwrap_or_else(|| JsonValue::from(surface));
    Ok((entity.to_string(), value))
}
