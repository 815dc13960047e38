//! Events that make up a story step

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use dialogue_import_core::{Entity, IntentPrediction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StoryEvent {
    /// User turn
    UserUttered {
        /// Raw text as written in the story
        text: Option<String>,
        intent: Option<IntentPrediction>,
        #[serde(default)]
        entities: Vec<Entity>,
    },
    /// Bot action
    ActionExecuted { name: String },
    SlotSet { key: String, value: JsonValue },
    /// Form activation; `None` deactivates
    ActiveForm { name: Option<String> },
}

impl StoryEvent {
    pub fn action(name: impl Into<String>) -> Self {
        Self::ActionExecuted { name: name.into() }
    }

    pub fn slot(key: impl Into<String>, value: JsonValue) -> Self {
        Self::SlotSet {
            key: key.into(),
            value,
        }
    }

    pub fn intent_name(&self) -> Option<&str> {
        match self {
            Self::UserUttered { intent, .. } => intent.as_ref().map(|i| i.name.as_str()),
            _ => None,
        }
    }

    pub fn action_name(&self) -> Option<&str> {
        match self {
            Self::ActionExecuted { name } => Some(name),
            _ => None,
        }
    }

    pub fn is_user_turn(&self) -> bool {
        matches!(self, Self::UserUttered { .. })
    }
}

impl fmt::Display for StoryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserUttered { text, intent, .. } => match (intent, text) {
                (Some(intent), _) => write!(f, "* {}", intent.name),
                (None, Some(text)) => write!(f, "* {}", text),
                (None, None) => write!(f, "*"),
            },
            Self::ActionExecuted { name } => write!(f, "- {}", name),
            Self::SlotSet { key, value } => write!(f, "- slot{{\"{}\": {}}}", key, value),
            Self::ActiveForm { name: Some(name) } => write!(f, "- form{{\"name\": \"{}\"}}", name),
            Self::ActiveForm { name: None } => write!(f, "- form{{\"name\": null}}"),
        }
    }
}
