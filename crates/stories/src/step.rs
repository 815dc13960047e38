//! Story steps and checkpoints

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::path::Path;

use crate::events::StoryEvent;

/// Checkpoint every story without an explicit start begins from
pub const STORY_START: &str = "STORY_START";

/// Named resumption point, optionally guarded by slot conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub name: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub conditions: Map<String, JsonValue>,
}

impl Checkpoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            conditions: Map::new(),
        }
    }

    pub fn with_conditions(name: impl Into<String>, conditions: Map<String, JsonValue>) -> Self {
        Self {
            name: name.into(),
            conditions,
        }
    }

    pub fn is_story_start(&self) -> bool {
        self.name == STORY_START
    }
}

/// One node of the story graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryStep {
    /// Unique, deterministic id: `<file>::<block>::<ordinal>`
    pub id: String,
    /// Name of the `##` block the step came from
    pub block_name: String,
    /// File the step was read from
    pub source: String,
    /// Position of the block within its file
    pub block_index: usize,
    pub start_checkpoints: Vec<Checkpoint>,
    pub end_checkpoints: Vec<Checkpoint>,
    pub events: Vec<StoryEvent>,
}

impl StoryStep {
    pub fn new(
        id: impl Into<String>,
        block_name: impl Into<String>,
        source: impl Into<String>,
        block_index: usize,
        start_checkpoints: Vec<Checkpoint>,
    ) -> Self {
        Self {
            id: id.into(),
            block_name: block_name.into(),
            source: source.into(),
            block_index,
            start_checkpoints,
            end_checkpoints: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Key identifying the story this step belongs to
    ///
    /// Built from the file name, block name and block index only, so the
    /// key is the same wherever the training data is checked out.
    pub fn story_key(&self) -> String {
        let file = Path::new(&self.source)
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_else(|| self.source.as_str().into());
        format!("{}#{}#{}", file, self.block_name, self.block_index)
    }

    pub fn starts_at(&self, checkpoint: &str) -> bool {
        self.start_checkpoints.iter().any(|c| c.name == checkpoint)
    }

    pub fn ends_with(&self, checkpoint: &str) -> bool {
        self.end_checkpoints.iter().any(|c| c.name == checkpoint)
    }

    pub fn starts_at_story_start(&self) -> bool {
        self.start_checkpoints.iter().any(Checkpoint::is_story_start)
    }

    pub fn intents(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(StoryEvent::intent_name)
    }

    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(StoryEvent::action_name)
    }

    /// Copy with a fresh id, same checkpoints and events
    pub(crate) fn copy_with_id(&self, id: String) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }
}
