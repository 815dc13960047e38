//! NLU training data
//!
//! A language-tagged collection of labelled examples plus the auxiliary
//! tables (synonyms, regex features, lookup tables) NLU files can declare.
//! Merging concatenates examples; duplicates are kept.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::Entity;

/// Language used when the caller does not specify one
pub const DEFAULT_LANGUAGE: &str = "en";

/// A single labelled example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    /// Response text for retrieval intents
    #[serde(default)]
    pub response: Option<String>,
}

impl Message {
    pub fn new(text: impl Into<String>, intent: Option<String>) -> Self {
        Self {
            text: text.into(),
            intent,
            entities: Vec::new(),
            response: None,
        }
    }

    pub fn with_entities(mut self, entities: Vec<Entity>) -> Self {
        self.entities = entities;
        self
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }
}

/// Named regular expression feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexFeature {
    pub name: String,
    pub pattern: String,
}

/// Named lookup table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTable {
    pub name: String,
    pub elements: Vec<String>,
}

/// NLU training data for one language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingData {
    pub language: String,
    #[serde(default)]
    pub training_examples: Vec<Message>,
    /// Synonym text -> canonical value
    #[serde(default)]
    pub entity_synonyms: BTreeMap<String, String>,
    #[serde(default)]
    pub regex_features: Vec<RegexFeature>,
    #[serde(default)]
    pub lookup_tables: Vec<LookupTable>,
}

impl Default for TrainingData {
    fn default() -> Self {
        Self::empty(DEFAULT_LANGUAGE)
    }
}

impl TrainingData {
    pub fn empty(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            training_examples: Vec::new(),
            entity_synonyms: BTreeMap::new(),
            regex_features: Vec::new(),
            lookup_tables: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.training_examples.is_empty()
            && self.entity_synonyms.is_empty()
            && self.regex_features.is_empty()
            && self.lookup_tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.training_examples.len()
    }

    /// Append another set; examples are concatenated without deduplication
    pub fn extend(&mut self, other: TrainingData) {
        self.training_examples.extend(other.training_examples);
        for (synonym, value) in other.entity_synonyms {
            if let Some(existing) = self.entity_synonyms.get(&synonym) {
                if existing != &value {
                    tracing::warn!(
                        synonym = %synonym,
                        kept = %existing,
                        ignored = %value,
                        "Conflicting entity synonym mapping"
                    );
                }
                continue;
            }
            self.entity_synonyms.insert(synonym, value);
        }
        self.regex_features.extend(other.regex_features);
        self.lookup_tables.extend(other.lookup_tables);
    }

    /// Merge several sets into one tagged with `language`
    pub fn merge(language: impl Into<String>, parts: impl IntoIterator<Item = TrainingData>) -> Self {
        let mut merged = Self::empty(language);
        for part in parts {
            merged.extend(part);
        }
        merged
    }

    /// Examples labelled with an intent
    pub fn intent_examples(&self) -> impl Iterator<Item = &Message> {
        self.training_examples.iter().filter(|m| m.intent.is_some())
    }

    /// Examples carrying at least one entity
    pub fn entity_examples(&self) -> impl Iterator<Item = &Message> {
        self.training_examples
            .iter()
            .filter(|m| !m.entities.is_empty())
    }

    /// Examples carrying a response
    pub fn response_examples(&self) -> impl Iterator<Item = &Message> {
        self.training_examples
            .iter()
            .filter(|m| m.response.is_some())
    }

    /// Distinct intent names
    pub fn intents(&self) -> BTreeSet<&str> {
        self.training_examples
            .iter()
            .filter_map(|m| m.intent.as_deref())
            .collect()
    }

    /// Distinct entity types
    pub fn entities(&self) -> BTreeSet<&str> {
        self.training_examples
            .iter()
            .flat_map(|m| m.entities.iter().map(|e| e.entity.as_str()))
            .collect()
    }

    /// Example count per intent
    pub fn examples_per_intent(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for intent in self.training_examples.iter().filter_map(|m| m.intent.as_deref()) {
            *counts.entry(intent).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(texts: &[(&str, &str)]) -> TrainingData {
        let mut data = TrainingData::empty("en");
        for (text, intent) in texts {
            data.training_examples
                .push(Message::new(*text, Some(intent.to_string())));
        }
        data
    }

    #[test]
    fn test_merge_keeps_duplicates() {
        let a = sample(&[("hello", "greet"), ("bye", "goodbye")]);
        let b = sample(&[("hello", "greet")]);

        let merged = TrainingData::merge("de", vec![a, b]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.language, "de");
        assert_eq!(merged.examples_per_intent()["greet"], 2);
    }

    #[test]
    fn test_synonym_conflict_keeps_first() {
        let mut a = TrainingData::empty("en");
        a.entity_synonyms.insert("NYC".into(), "new york".into());
        let mut b = TrainingData::empty("en");
        b.entity_synonyms.insert("NYC".into(), "nyc city".into());

        a.extend(b);
        assert_eq!(a.entity_synonyms["NYC"], "new york");
    }

    #[test]
    fn test_example_views() {
        let mut data = sample(&[("hi", "greet")]);
        data.training_examples.push(
            Message::new("to berlin", Some("travel".into()))
                .with_entities(vec![Entity::spanning("city", "berlin", 3, 9)]),
        );
        data.training_examples
            .push(Message::new("who are you", Some("faq/ask_name".into())).with_response("Sara"));

        assert_eq!(data.intent_examples().count(), 3);
        assert_eq!(data.entity_examples().count(), 1);
        assert_eq!(data.response_examples().count(), 1);
        assert!(data.entities().contains("city"));
        assert_eq!(data.intents().len(), 3);
    }

    #[test]
    fn test_empty_default() {
        let data = TrainingData::default();
        assert!(data.is_empty());
        assert_eq!(data.language, DEFAULT_LANGUAGE);
    }
}
