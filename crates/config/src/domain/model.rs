//! Dialogue domain model
//!
//! The catalog of intents, entities, slots, actions, forms and responses a
//! dialogue system can reference. Parsed from YAML domain files.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::constants::domain::{DEFAULT_ACTIONS, DOMAIN_EXTENSIONS, UTTER_PREFIX};
use crate::ConfigError;

/// Slot types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    #[default]
    Text,
    Bool,
    Categorical,
    Float,
    List,
    Unfeaturized,
    Any,
    /// Custom slot classes
    #[serde(other)]
    Custom,
}

/// Slot definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotDefinition {
    #[serde(rename = "type", default)]
    pub slot_type: SlotType,
    #[serde(default)]
    pub initial_value: Option<JsonValue>,
    /// Allowed values for categorical slots
    #[serde(default)]
    pub values: Vec<JsonValue>,
    #[serde(default = "default_true")]
    pub auto_fill: bool,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
}

fn default_true() -> bool {
    true
}

impl Default for SlotDefinition {
    fn default() -> Self {
        Self {
            slot_type: SlotType::default(),
            initial_value: None,
            values: Vec::new(),
            auto_fill: true,
            min_value: None,
            max_value: None,
        }
    }
}

/// Which entities an intent uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UseEntities {
    All(bool),
    Only(Vec<String>),
}

impl Default for UseEntities {
    fn default() -> Self {
        Self::All(true)
    }
}

/// Per-intent properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentProperties {
    #[serde(default)]
    pub use_entities: UseEntities,
    #[serde(default)]
    pub ignore_entities: Vec<String>,
    /// Action triggered directly by this intent
    #[serde(default)]
    pub triggers: Option<String>,
}

/// One variant of a bot response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseVariant {
    #[serde(default)]
    pub text: Option<String>,
    /// Buttons, images, custom payloads and channel keys
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawIntent {
    Name(String),
    WithProperties(BTreeMap<String, Option<IntentProperties>>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawForms {
    List(Vec<String>),
    Map(BTreeMap<String, Option<JsonValue>>),
}

impl Default for RawForms {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawDomain {
    #[serde(default)]
    intents: Vec<RawIntent>,
    #[serde(default)]
    entities: Vec<String>,
    #[serde(default)]
    slots: BTreeMap<String, SlotDefinition>,
    #[serde(default)]
    actions: Vec<String>,
    #[serde(default)]
    forms: RawForms,
    #[serde(default, alias = "templates")]
    responses: BTreeMap<String, Vec<ResponseVariant>>,
    #[serde(default)]
    session_config: Option<JsonValue>,
}

/// Dialogue domain
///
/// List fields keep declaration order and any duplicates so the validator
/// can report them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    pub intents: Vec<String>,
    pub intent_properties: BTreeMap<String, IntentProperties>,
    pub entities: Vec<String>,
    pub slots: BTreeMap<String, SlotDefinition>,
    pub actions: Vec<String>,
    pub forms: Vec<String>,
    pub responses: BTreeMap<String, Vec<ResponseVariant>>,
    pub session_config: Option<JsonValue>,
}

impl Domain {
    /// The empty domain
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
            && self.entities.is_empty()
            && self.slots.is_empty()
            && self.actions.is_empty()
            && self.forms.is_empty()
            && self.responses.is_empty()
    }

    /// Parse a YAML domain document
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::empty());
        }
        let raw: Option<RawDomain> = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse domain: {}", e)))?;
        Ok(raw.map(Self::from_raw).unwrap_or_default())
    }

    /// Load from a file, or merge every YAML file in a directory
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        if path.is_dir() {
            return Self::load_directory(path);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::ParseError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    fn load_directory(dir: &Path) -> Result<Self, ConfigError> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            ConfigError::ParseError(format!("Failed to read directory {}: {}", dir.display(), e))
        })?;

        let mut files: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .and_then(|e| e.to_str())
                        .map(|e| DOMAIN_EXTENSIONS.contains(&e))
                        .unwrap_or(false)
            })
            .collect();
        files.sort();

        let mut domain = Self::empty();
        for file in files {
            let part = Self::load(&file)?;
            tracing::debug!(path = %file.display(), "Merged domain file");
            domain = domain.merge(part);
        }
        Ok(domain)
    }

    fn from_raw(raw: RawDomain) -> Self {
        let mut intents = Vec::with_capacity(raw.intents.len());
        let mut intent_properties = BTreeMap::new();
        for intent in raw.intents {
            match intent {
                RawIntent::Name(name) => intents.push(name),
                RawIntent::WithProperties(map) => {
                    for (name, props) in map {
                        intent_properties.insert(name.clone(), props.unwrap_or_default());
                        intents.push(name);
                    }
                }
            }
        }

        let forms = match raw.forms {
            RawForms::List(forms) => forms,
            RawForms::Map(map) => map.into_keys().collect(),
        };

        Self {
            intents,
            intent_properties,
            entities: raw.entities,
            slots: raw.slots,
            actions: raw.actions,
            forms,
            responses: raw.responses,
            session_config: raw.session_config,
        }
    }

    /// Combine two domains; on conflicts `self` wins
    pub fn merge(mut self, other: Domain) -> Self {
        merge_list(&mut self.intents, other.intents);
        merge_list(&mut self.entities, other.entities);
        merge_list(&mut self.actions, other.actions);
        merge_list(&mut self.forms, other.forms);

        for (name, props) in other.intent_properties {
            self.intent_properties.entry(name).or_insert(props);
        }
        for (name, slot) in other.slots {
            self.slots.entry(name).or_insert(slot);
        }
        for (name, variants) in other.responses {
            self.responses.entry(name).or_insert(variants);
        }
        if self.session_config.is_none() {
            self.session_config = other.session_config;
        }
        self
    }

    /// All action names: built-ins, user actions, forms and responses
    pub fn action_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        DEFAULT_ACTIONS
            .iter()
            .copied()
            .chain(self.actions.iter().map(|s| s.as_str()))
            .chain(self.forms.iter().map(|s| s.as_str()))
            .chain(self.responses.keys().map(|s| s.as_str()))
            .filter(|name| seen.insert(*name))
            .collect()
    }

    pub fn has_intent(&self, name: &str) -> bool {
        self.intents.iter().any(|i| i == name)
    }

    pub fn has_action(&self, name: &str) -> bool {
        DEFAULT_ACTIONS.contains(&name)
            || self.actions.iter().any(|a| a == name)
            || self.forms.iter().any(|f| f == name)
            || self.responses.contains_key(name)
    }

    pub fn has_slot(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn has_entity(&self, name: &str) -> bool {
        self.entities.iter().any(|e| e == name)
    }

    /// `utter_` actions with no response defined
    pub fn missing_templates(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter(|a| a.starts_with(UTTER_PREFIX) && !self.responses.contains_key(a.as_str()))
            .map(|a| a.as_str())
            .collect()
    }
}

fn merge_list(target: &mut Vec<String>, other: Vec<String>) {
    for item in other {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = r#"
intents:
  - greet
  - inform:
      use_entities: [city]
  - chitchat:
      triggers: utter_chitchat
entities:
  - city
slots:
  city:
    type: text
  confirmed:
    type: categorical
    values: [yes, no]
actions:
  - utter_greet
  - utter_ask_city
  - action_search
forms:
  - booking_form
responses:
  utter_greet:
    - text: "Hi!"
    - text: "Hello!"
      channel: slack
  utter_chitchat:
    - text: "Let's stay on topic"
"#;

    #[test]
    fn test_domain_deserialization() {
        let domain = Domain::from_yaml(DOMAIN).unwrap();
        assert_eq!(domain.intents, vec!["greet", "inform", "chitchat"]);
        assert_eq!(
            domain.intent_properties["inform"].use_entities,
            UseEntities::Only(vec!["city".to_string()])
        );
        assert_eq!(
            domain.intent_properties["chitchat"].triggers.as_deref(),
            Some("utter_chitchat")
        );
        assert_eq!(domain.slots["confirmed"].slot_type, SlotType::Categorical);
        assert_eq!(domain.responses["utter_greet"].len(), 2);
        assert_eq!(
            domain.responses["utter_greet"][1].extra.get("channel"),
            Some(&JsonValue::String("slack".to_string()))
        );
        assert_eq!(domain.forms, vec!["booking_form"]);
    }

    #[test]
    fn test_templates_alias_and_form_map() {
        let yaml = r#"
actions: [utter_bye]
templates:
  utter_bye:
    - text: "Bye"
forms:
  booking_form:
    required_slots: {}
"#;
        let domain = Domain::from_yaml(yaml).unwrap();
        assert!(domain.responses.contains_key("utter_bye"));
        assert_eq!(domain.forms, vec!["booking_form"]);
    }

    #[test]
    fn test_action_names_include_defaults_and_forms() {
        let domain = Domain::from_yaml(DOMAIN).unwrap();
        let names = domain.action_names();
        assert!(names.contains(&"action_listen"));
        assert!(names.contains(&"booking_form"));
        assert!(names.contains(&"utter_chitchat"));
        assert!(domain.has_action("action_search"));
        assert!(!domain.has_action("action_unknown"));
    }

    #[test]
    fn test_missing_templates() {
        let domain = Domain::from_yaml(DOMAIN).unwrap();
        assert_eq!(domain.missing_templates(), vec!["utter_ask_city"]);
    }

    #[test]
    fn test_merge_prefers_self() {
        let a = Domain::from_yaml(
            "intents: [greet]\nresponses:\n  utter_greet:\n    - text: A\n",
        )
        .unwrap();
        let b = Domain::from_yaml(
            "intents: [greet, bye]\nresponses:\n  utter_greet:\n    - text: B\n",
        )
        .unwrap();

        let merged = a.merge(b);
        assert_eq!(merged.intents, vec!["greet", "bye"]);
        assert_eq!(
            merged.responses["utter_greet"][0].text.as_deref(),
            Some("A")
        );
    }

    #[test]
    fn test_empty_document() {
        assert!(Domain::from_yaml("").unwrap().is_empty());
        assert!(Domain::empty().is_empty());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(Domain::from_yaml("intents: [greet\n").is_err());
        assert!(Domain::from_yaml("intents: 5\n").is_err());
    }
}
