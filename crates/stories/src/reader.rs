//! Story file reader
//!
//! Parses one Markdown-style story file into story steps:
//!
//! ```text
//! ## greet and ask name
//! * greet
//!   - utter_greet
//! > ask_name
//!
//! ## name given
//! > ask_name
//! * inform{"name": "Ada"} OR introduce{"name": "Ada"}
//!   - slot{"name": "Ada"}
//!   - utter_thanks
//! ```
//!
//! A checkpoint line before any event of a block is a start checkpoint;
//! after events it ends the current steps and the following events begin a
//! new step from it. `OR` alternatives fork the current steps.
//!
//! Errors that make the file unusable (bad JSON, an event before the first
//! block, an unknown template variable) are returned as `ImportError::Parse`
//! naming the line. Lines that are merely unrecognised are skipped and
//! reported as warnings.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value as JsonValue};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use dialogue_import_core::{ImportError, IntentPrediction, Result};
use dialogue_import_text_processing::{parse_annotated, parse_intent_syntax};

use crate::events::StoryEvent;
use crate::graph::GraphWarning;
use crate::options::StoryReadOptions;
use crate::step::{Checkpoint, StoryStep, STORY_START};
use crate::template;

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static EVENT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?P<name>[^{]+?)\s*(?P<params>\{.*\})?\s*$").unwrap());
static E2E_LABELLED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<intent>[^{}:\s]+)\s*:\s*(?P<text>.*)$").unwrap());

const FORM_PREFIX: &str = "form: ";
const OR_SEPARATOR: &str = " OR ";

/// Steps and non-fatal findings from one story file
#[derive(Debug, Clone, Default)]
pub struct ParsedStoryFile {
    pub path: PathBuf,
    pub steps: Vec<StoryStep>,
    pub warnings: Vec<GraphWarning>,
}

pub struct StoryFileReader<'a> {
    path: &'a Path,
    options: &'a StoryReadOptions,
}

impl<'a> StoryFileReader<'a> {
    pub fn new(path: &'a Path, options: &'a StoryReadOptions) -> Self {
        Self { path, options }
    }

    /// Read and parse the file
    pub async fn read(&self) -> Result<ParsedStoryFile> {
        let content = tokio::fs::read_to_string(self.path)
            .await
            .map_err(|e| ImportError::io(self.path, e))?;
        self.parse(&content).await
    }

    /// Parse story file content
    pub async fn parse(&self, content: &str) -> Result<ParsedStoryFile> {
        let source = self.path.display().to_string();
        let mut ids = IdGenerator::new(&source);
        let mut parsed = ParsedStoryFile {
            path: self.path.to_path_buf(),
            ..Default::default()
        };
        let mut block: Option<BlockBuilder> = None;
        let mut block_count = 0;

        let content = strip_comments(content);
        for (idx, raw) in content.lines().enumerate() {
            let number = idx + 1;
            let line = self.prepare_line(raw).map_err(|e| self.error(number, e))?;
            if line.is_empty() {
                continue;
            }

            if line.starts_with('#') {
                if let Some(finished) = block.take() {
                    parsed.steps.extend(finished.flush());
                }
                let name = line.trim_start_matches('#').trim();
                block = Some(BlockBuilder::new(name, block_count));
                block_count += 1;
            } else if let Some(rest) = line.strip_prefix('>') {
                let current = block
                    .as_mut()
                    .ok_or_else(|| self.error(number, "Checkpoint before any story block"))?;
                let (name, conditions) = parse_event_line(rest).map_err(|e| self.error(number, e))?;
                if current.add_checkpoint(Checkpoint::with_conditions(name, conditions), &mut ids) {
                    tracing::warn!(
                        path = %source,
                        line = number,
                        "End checkpoints do not support conditions, ignoring them"
                    );
                }
            } else if let Some(rest) = line.strip_prefix('-') {
                let current = block
                    .as_mut()
                    .ok_or_else(|| self.error(number, "Event before any story block"))?;
                let (name, params) = parse_event_line(rest).map_err(|e| self.error(number, e))?;
                for event in events_from(&name, params).map_err(|e| self.error(number, e))? {
                    current.add_event(event, &mut ids);
                }
            } else if let Some(rest) = line.strip_prefix('*') {
                if block.is_none() {
                    return Err(self.error(number, "User message before any story block"));
                }
                let mut turns = Vec::new();
                for alternative in rest.split(OR_SEPARATOR).map(str::trim) {
                    turns.push(self.user_turn(alternative).await.map_err(|e| self.error(number, e))?);
                }
                if let Some(current) = block.as_mut() {
                    current.add_user_turns(turns, &mut ids);
                }
            } else {
                tracing::warn!(
                    path = %source,
                    line = number,
                    content = %line,
                    "Skipping line, no valid command found"
                );
                parsed.warnings.push(GraphWarning::SkippedLine {
                    path: self.path.to_path_buf(),
                    line: number,
                    content: line.to_string(),
                });
            }
        }

        if let Some(finished) = block.take() {
            parsed.steps.extend(finished.flush());
        }

        tracing::debug!(
            path = %source,
            blocks = block_count,
            steps = parsed.steps.len(),
            "Read story file"
        );
        Ok(parsed)
    }

    fn prepare_line<'l>(&self, raw: &'l str) -> std::result::Result<Cow<'l, str>, String> {
        let trimmed = raw.trim();
        let line: Cow<'l, str> = match strip_form_prefix(trimmed) {
            Some(stripped) => Cow::Owned(stripped),
            None => Cow::Borrowed(trimmed),
        };

        match &self.options.template_variables {
            Some(variables) => Ok(Cow::Owned(template::substitute(&line, variables)?)),
            None => Ok(line),
        }
    }

    async fn user_turn(&self, text: &str) -> std::result::Result<StoryEvent, String> {
        if !self.options.use_e2e {
            let parsed = parse_intent_syntax(text)?;
            return Ok(StoryEvent::UserUttered {
                text: Some(parsed.text),
                intent: parsed.intent,
                entities: parsed.entities,
            });
        }

        let labelled = E2E_LABELLED
            .captures(text)
            .map(|caps| (caps["intent"].to_string(), caps["text"].to_string()));
        if let Some((intent, message)) = labelled {
            let annotated = parse_annotated(&message)?;
            return Ok(StoryEvent::UserUttered {
                text: Some(annotated.text),
                intent: Some(IntentPrediction::new(intent, 1.0)),
                entities: annotated.entities,
            });
        }

        let parsed = self.options.interpreter.parse(text).await;
        Ok(StoryEvent::UserUttered {
            text: Some(text.to_string()),
            intent: parsed.intent,
            entities: parsed.entities,
        })
    }

    fn error(&self, line: usize, message: impl std::fmt::Display) -> ImportError {
        ImportError::parse(self.path, format!("line {}: {}", line, message))
    }
}

/// Remove comments, keeping line numbers intact
fn strip_comments(content: &str) -> Cow<'_, str> {
    COMMENT.replace_all(content, |caps: &regex::Captures<'_>| {
        "\n".repeat(caps[0].matches('\n').count())
    })
}

/// `* form: inform` and `- form: utter_ask` drop the `form: ` marker
fn strip_form_prefix(line: &str) -> Option<String> {
    let marker = line.chars().next().filter(|c| *c == '*' || *c == '-')?;
    line[1..]
        .trim_start()
        .strip_prefix(FORM_PREFIX)
        .map(|stripped| format!("{} {}", marker, stripped))
}

/// `name{"key": value}` into the name and its parameter object
fn parse_event_line(line: &str) -> std::result::Result<(String, Map<String, JsonValue>), String> {
    let caps = EVENT_LINE
        .captures(line)
        .ok_or_else(|| format!("Malformed line '{}'", line.trim()))?;
    let name = caps["name"].trim().to_string();
    if name.is_empty() {
        return Err(format!("Missing name in '{}'", line.trim()));
    }

    let params = match caps.name("params") {
        Some(raw) => match serde_json::from_str::<JsonValue>(raw.as_str()) {
            Ok(JsonValue::Object(map)) => map,
            Ok(_) => return Err(format!("Parameters of '{}' must be an object", name)),
            Err(e) => return Err(format!("Invalid parameters for '{}': {}", name, e)),
        },
        None => Map::new(),
    };
    Ok((name, params))
}

fn events_from(
    name: &str,
    params: Map<String, JsonValue>,
) -> std::result::Result<Vec<StoryEvent>, String> {
    match name {
        "slot" => Ok(params
            .into_iter()
            .map(|(key, value)| StoryEvent::slot(key, value))
            .collect()),
        "form" => match params.get("name") {
            Some(JsonValue::String(form)) => Ok(vec![StoryEvent::ActiveForm {
                name: Some(form.clone()),
            }]),
            Some(JsonValue::Null) => Ok(vec![StoryEvent::ActiveForm { name: None }]),
            _ => Err("Form event needs a 'name' string or null".to_string()),
        },
        _ if params.is_empty() => Ok(vec![StoryEvent::action(name)]),
        _ => Err(format!("Unsupported event '{}' with parameters", name)),
    }
}

struct IdGenerator {
    source: String,
    next: usize,
}

impl IdGenerator {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            next: 0,
        }
    }

    fn next(&mut self, block: &str) -> String {
        let id = format!("{}::{}::{}", self.source, block, self.next);
        self.next += 1;
        id
    }
}

/// Accumulates the steps of one `##` block
struct BlockBuilder {
    name: String,
    index: usize,
    start_checkpoints: Vec<Checkpoint>,
    current: Vec<StoryStep>,
    finished: Vec<StoryStep>,
}

impl BlockBuilder {
    fn new(name: &str, index: usize) -> Self {
        Self {
            name: name.to_string(),
            index,
            start_checkpoints: Vec::new(),
            current: Vec::new(),
            finished: Vec::new(),
        }
    }

    /// Returns true when conditions were given on an end checkpoint
    fn add_checkpoint(&mut self, checkpoint: Checkpoint, ids: &mut IdGenerator) -> bool {
        if self.current.is_empty() {
            self.start_checkpoints.push(checkpoint);
            return false;
        }

        let dropped_conditions = !checkpoint.conditions.is_empty();
        let end = Checkpoint::new(checkpoint.name);
        let mut forks = Vec::new();
        for step in self.current.iter_mut() {
            if step.end_checkpoints.is_empty() {
                step.end_checkpoints.push(end.clone());
            } else {
                let mut fork = step.copy_with_id(ids.next(&self.name));
                fork.end_checkpoints = vec![end.clone()];
                forks.push(fork);
            }
        }
        self.current.extend(forks);
        dropped_conditions
    }

    fn add_event(&mut self, event: StoryEvent, ids: &mut IdGenerator) {
        self.ensure_current_steps(ids);
        for step in self.current.iter_mut() {
            step.events.push(event.clone());
        }
    }

    fn add_user_turns(&mut self, turns: Vec<StoryEvent>, ids: &mut IdGenerator) {
        self.ensure_current_steps(ids);
        if turns.len() == 1 {
            for turn in turns {
                for step in self.current.iter_mut() {
                    step.events.push(turn.clone());
                }
            }
            return;
        }

        let mut branched = Vec::with_capacity(self.current.len() * turns.len());
        for step in &self.current {
            for turn in &turns {
                let mut copy = step.copy_with_id(ids.next(&self.name));
                copy.events.push(turn.clone());
                branched.push(copy);
            }
        }
        self.current = branched;
    }

    /// Steps that already ended are finished; new events go to open steps
    /// or, when none are open, to fresh steps continuing from the ends.
    fn ensure_current_steps(&mut self, ids: &mut IdGenerator) {
        let (completed, open): (Vec<_>, Vec<_>) = std::mem::take(&mut self.current)
            .into_iter()
            .partition(|step| !step.end_checkpoints.is_empty());

        if !open.is_empty() {
            self.finished.extend(completed);
            self.current = open;
            return;
        }

        let starts = if completed.is_empty() {
            self.start_checkpoints.clone()
        } else {
            let mut names: Vec<&str> = Vec::new();
            for checkpoint in completed.iter().flat_map(|s| s.end_checkpoints.iter()) {
                if !names.contains(&checkpoint.name.as_str()) {
                    names.push(checkpoint.name.as_str());
                }
            }
            names.into_iter().map(Checkpoint::new).collect()
        };
        let starts = if starts.is_empty() {
            vec![Checkpoint::new(STORY_START)]
        } else {
            starts
        };

        self.finished.extend(completed);
        self.current = vec![StoryStep::new(
            ids.next(&self.name),
            self.name.clone(),
            ids.source.clone(),
            self.index,
            starts,
        )];
    }

    fn flush(mut self) -> Vec<StoryStep> {
        self.finished.append(&mut self.current);
        self.finished
    }
}
