//! NLU training file parsing
//!
//! Supported formats:
//! - Markdown sections (`## intent:greet` followed by `- hello` items)
//! - JSON (`{"rasa_nlu_data": {...}}`)
//!
//! Format is decided from file content, not from the extension.

mod json;
mod markdown;

use async_trait::async_trait;
use std::path::Path;

use dialogue_import_core::{ImportError, NluFormatParser, Result, TrainingData};

pub use json::parse_json;
pub use markdown::MarkdownNluReader;

/// Section headers that mark a Markdown NLU file
pub const MARKDOWN_SECTION_MARKERS: &[&str] =
    &["## intent:", "## synonym:", "## regex:", "## lookup:"];

/// Top-level key of JSON NLU files
pub const JSON_ROOT_KEY: &str = "rasa_nlu_data";

/// Detected NLU file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NluFormat {
    Markdown,
    Json,
    Unknown,
}

impl NluFormat {
    /// Sniff the format of already loaded file content
    pub fn from_content(content: &str) -> Self {
        let trimmed = content.trim_start();
        if trimmed.starts_with('{') {
            return match serde_json::from_str::<serde_json::Value>(trimmed) {
                Ok(value) if value.get(JSON_ROOT_KEY).is_some() => Self::Json,
                _ => Self::Unknown,
            };
        }

        let is_markdown = content.lines().any(|line| {
            let line = line.trim_start();
            MARKDOWN_SECTION_MARKERS
                .iter()
                .any(|marker| line.starts_with(marker))
        });
        if is_markdown {
            Self::Markdown
        } else {
            Self::Unknown
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Self::Unknown
    }
}

/// Sniff the format of the file at `path`
///
/// Unreadable files (including binary ones) are `Unknown`.
pub fn guess_format(path: &Path) -> NluFormat {
    match std::fs::read_to_string(path) {
        Ok(content) => NluFormat::from_content(&content),
        Err(e) => {
            tracing::trace!(path = %path.display(), error = %e, "Cannot sniff file format");
            NluFormat::Unknown
        }
    }
}

/// Parser for every supported NLU format
#[derive(Debug, Clone, Default)]
pub struct NluFileParser;

impl NluFileParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NluFormatParser for NluFileParser {
    async fn parse(&self, path: &Path, language: &str) -> Result<TrainingData> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ImportError::io(path, e))?;

        let data = match NluFormat::from_content(&content) {
            NluFormat::Json => parse_json(path, &content, language)?,
            NluFormat::Markdown => MarkdownNluReader::new(path, language).read(&content).await?,
            NluFormat::Unknown => {
                return Err(ImportError::parse(path, "Unrecognised NLU file format"));
            }
        };

        tracing::debug!(
            path = %path.display(),
            examples = data.len(),
            synonyms = data.entity_synonyms.len(),
            "Parsed NLU file"
        );
        Ok(data)
    }

    fn recognizes(&self, path: &Path) -> bool {
        guess_format(path).is_known()
    }
}
