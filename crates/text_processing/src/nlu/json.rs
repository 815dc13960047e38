//! JSON NLU format

use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::Path;

use dialogue_import_core::{
    Entity, ImportError, LookupTable, Message, RegexFeature, Result, TrainingData,
};

#[derive(Debug, Deserialize)]
struct JsonNluFile {
    rasa_nlu_data: JsonNluData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JsonNluData {
    common_examples: Vec<JsonExample>,
    intent_examples: Vec<JsonExample>,
    entity_examples: Vec<JsonExample>,
    regex_features: Vec<RegexFeature>,
    lookup_tables: Vec<LookupTable>,
    entity_synonyms: Vec<JsonSynonym>,
}

#[derive(Debug, Deserialize)]
struct JsonExample {
    text: String,
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    entities: Vec<JsonEntity>,
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JsonEntity {
    entity: String,
    #[serde(default)]
    value: Option<JsonValue>,
    #[serde(default)]
    start: Option<usize>,
    #[serde(default)]
    end: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct JsonSynonym {
    value: String,
    #[serde(default)]
    synonyms: Vec<String>,
}

/// Parse JSON NLU content from `path`
pub fn parse_json(path: &Path, content: &str, language: &str) -> Result<TrainingData> {
    let file: JsonNluFile =
        serde_json::from_str(content).map_err(|e| ImportError::parse(path, e.to_string()))?;
    let nlu = file.rasa_nlu_data;

    let mut data = TrainingData::empty(language);
    let examples = nlu
        .common_examples
        .into_iter()
        .chain(nlu.intent_examples)
        .chain(nlu.entity_examples);

    for example in examples {
        let mut entities = Vec::with_capacity(example.entities.len());
        for raw in example.entities {
            let surface = surface_text(&example.text, raw.start, raw.end);
            let value = match (raw.value, &surface) {
                (Some(value), _) => value,
                (None, Some(surface)) => JsonValue::from(surface.as_str()),
                (None, None) => {
                    return Err(ImportError::parse(
                        path,
                        format!(
                            "Entity '{}' in '{}' has neither a value nor a valid span",
                            raw.entity, example.text
                        ),
                    ));
                }
            };

            if let (Some(surface), JsonValue::String(canonical)) = (&surface, &value) {
                if surface != canonical {
                    data.entity_synonyms
                        .entry(surface.clone())
                        .or_insert_with(|| canonical.clone());
                }
            }

            entities.push(Entity {
                entity: raw.entity,
                value,
                start: raw.start,
                end: raw.end,
            });
        }

        let mut message = Message::new(example.text, example.intent).with_entities(entities);
        message.response = example.response;
        data.training_examples.push(message);
    }

    for synonym in nlu.entity_synonyms {
        for alternative in synonym.synonyms {
            data.entity_synonyms
                .entry(alternative)
                .or_insert_with(|| synonym.value.clone());
        }
    }
    data.regex_features = nlu.regex_features;
    data.lookup_tables = nlu.lookup_tables;

    Ok(data)
}

/// Characters `start..end` of `text`, if the span is valid
fn surface_text(text: &str, start: Option<usize>, end: Option<usize>) -> Option<String> {
    let (start, end) = (start?, end?);
    if start > end || end > text.chars().count() {
        return None;
    }
    Some(text.chars().skip(start).take(end - start).collect())
}
