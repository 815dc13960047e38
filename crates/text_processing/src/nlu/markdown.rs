//! Markdown NLU reader

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use dialogue_import_core::{ImportError, LookupTable, Message, RegexFeature, Result, TrainingData};

use crate::annotations::parse_annotated;

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static SECTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^##\s*(?P<kind>[A-Za-z_]+)\s*:\s*(?P<name>.+?)\s*$").unwrap());

#[derive(Debug, Clone, PartialEq)]
enum Section {
    Intent(String),
    Synonym(String),
    Regex(String),
    Lookup(String),
}

/// Reads one Markdown NLU file
pub struct MarkdownNluReader {
    path: PathBuf,
    language: String,
}

impl MarkdownNluReader {
    pub fn new(path: &Path, language: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            language: language.to_string(),
        }
    }

    /// Parse file content; lookup tables given as file paths are read from disk
    pub async fn read(&self, content: &str) -> Result<TrainingData> {
        let mut data = TrainingData::empty(&self.language);
        let mut section: Option<Section> = None;
        let mut lookup_elements: Vec<String> = Vec::new();
        let mut lookup_files: Vec<(String, String)> = Vec::new();

        let stripped = COMMENT.replace_all(content, "");
        for (number, raw) in stripped.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with("##") {
                self.flush_lookup(&mut data, &section, &mut lookup_elements);
                section = Some(self.parse_header(line, number + 1)?);
                continue;
            }

            let item = match line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
                Some(item) => item.trim(),
                None => {
                    // A bare line under a lookup header names an element file
                    if let Some(Section::Lookup(name)) = &section {
                        lookup_files.push((name.clone(), line.to_string()));
                    } else {
                        tracing::debug!(
                            path = %self.path.display(),
                            line = number + 1,
                            "Ignoring line outside of a list item"
                        );
                    }
                    continue;
                }
            };

            match &section {
                Some(Section::Intent(intent)) => {
                    let annotated = parse_annotated(item).map_err(|e| self.error(number + 1, e))?;
                    for (synonym, value) in annotated.synonyms {
                        data.entity_synonyms.entry(synonym).or_insert(value);
                    }
                    data.training_examples.push(
                        Message::new(annotated.text, Some(intent.clone()))
                            .with_entities(annotated.entities),
                    );
                }
                Some(Section::Synonym(value)) => {
                    data.entity_synonyms
                        .entry(item.to_string())
                        .or_insert_with(|| value.clone());
                }
                Some(Section::Regex(name)) => data.regex_features.push(RegexFeature {
                    name: name.clone(),
                    pattern: item.to_string(),
                }),
                Some(Section::Lookup(_)) => lookup_elements.push(item.to_string()),
                None => {
                    return Err(self.error(number + 1, "List item before any section header"));
                }
            }
        }
        self.flush_lookup(&mut data, &section, &mut lookup_elements);

        for (name, file) in lookup_files {
            let elements = self.read_lookup_file(&file).await?;
            data.lookup_tables.push(LookupTable { name, elements });
        }

        Ok(data)
    }

    fn parse_header(&self, line: &str, number: usize) -> Result<Section> {
        let caps = SECTION_HEADER
            .captures(line)
            .ok_or_else(|| self.error(number, format!("Malformed section header '{}'", line)))?;
        let name = caps["name"].to_string();
        match &caps["kind"] {
            "intent" => Ok(Section::Intent(name)),
            "synonym" => Ok(Section::Synonym(name)),
            "regex" => Ok(Section::Regex(name)),
            "lookup" => Ok(Section::Lookup(name)),
            other => Err(self.error(number, format!("Unknown section type '{}'", other))),
        }
    }

    fn flush_lookup(&self, data: &mut TrainingData, section: &Option<Section>, elements: &mut Vec<String>) {
        if let Some(Section::Lookup(name)) = section {
            if !elements.is_empty() {
                data.lookup_tables.push(LookupTable {
                    name: name.clone(),
                    elements: std::mem::take(elements),
                });
            }
        }
    }

    async fn read_lookup_file(&self, file: &str) -> Result<Vec<String>> {
        let candidate = PathBuf::from(file);
        let resolved = if candidate.is_absolute() || candidate.exists() {
            candidate
        } else {
            self.path
                .parent()
                .map(|dir| dir.join(&candidate))
                .unwrap_or(candidate)
        };

        let content = tokio::fs::read_to_string(&resolved)
            .await
            .map_err(|e| ImportError::io(&resolved, e))?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn error(&self, line: usize, message: impl std::fmt::Display) -> ImportError {
        ImportError::parse(&self.path, format!("line {}: {}", line, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const NLU: &str = r#"
<!-- greetings -->
## intent:greet
- hey
- hello [Sara](name)

## intent:inform
- I live in [NYC](city:new york)

## synonym:berlin
- Berlin
- BER

## regex:zipcode
- [0-9]{5}

## lookup:fruits
- apple
- banana
"#;

    #[tokio::test]
    async fn test_sections() {
        let reader = MarkdownNluReader::new(Path::new("nlu.md"), "en");
        let data = reader.read(NLU).await.unwrap();

        assert_eq!(data.len(), 3);
        assert_eq!(data.training_examples[1].text, "hello Sara");
        assert_eq!(data.training_examples[1].entities[0].entity, "name");
        assert_eq!(data.entity_synonyms["NYC"], "new york");
        assert_eq!(data.entity_synonyms["BER"], "berlin");
        assert_eq!(data.regex_features[0].pattern, "[0-9]{5}");
        assert_eq!(data.lookup_tables[0].elements, vec!["apple", "banana"]);
    }

    #[tokio::test]
    async fn test_lookup_file_relative_to_nlu_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("cities.txt"), "berlin\n\nrome\n").unwrap();
        let path = dir.path().join("nlu.md");

        let reader = MarkdownNluReader::new(&path, "en");
        let data = reader.read("## lookup:cities\ncities.txt\n").await.unwrap();
        assert_eq!(data.lookup_tables[0].name, "cities");
        assert_eq!(data.lookup_tables[0].elements, vec!["berlin", "rome"]);
    }

    #[tokio::test]
    async fn test_errors_name_the_line() {
        let reader = MarkdownNluReader::new(Path::new("nlu.md"), "en");

        let err = reader.read("## intent:greet\n- hi\n## story:x\n").await.unwrap_err();
        assert!(err.to_string().contains("line 3"));

        assert!(reader.read("- orphan item\n").await.is_err());
        assert!(reader
            .read("## intent:inform\n- to [Paris]{bad}\n")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_retrieval_intent_names_kept() {
        let reader = MarkdownNluReader::new(Path::new("nlu.md"), "en");
        let data = reader.read("## intent:faq/ask_name\n- who are you\n").await.unwrap();
        assert_eq!(data.training_examples[0].intent.as_deref(), Some("faq/ask_name"));
    }
}
