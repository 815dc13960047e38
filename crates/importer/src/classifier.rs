//! Content-based training file classification
//!
//! Paths may be files or directories. Directories are walked recursively,
//! skipping hidden entries. A file is NLU data when its content is a known
//! NLU format; otherwise it is a story file when it is Markdown with a
//! `##` header and at least one story line (`*`, `-` or `>`).

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use dialogue_import_core::{ClassifiedFiles, FileClassifier};
use dialogue_import_text_processing::guess_format;

const STORY_EXTENSION: &str = "md";

#[derive(Debug, Clone, Default)]
pub struct ContentFileClassifier;

impl ContentFileClassifier {
    pub fn new() -> Self {
        Self
    }

    fn collect(path: &Path, files: &mut BTreeSet<PathBuf>) {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Training data path does not exist");
            return;
        }

        if !path.is_dir() {
            files.insert(path.to_path_buf());
            return;
        }

        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot read directory");
                return;
            }
        };

        for entry in entries.flatten() {
            let hidden = entry
                .file_name()
                .to_str()
                .map(|name| name.starts_with('.'))
                .unwrap_or(false);
            if !hidden {
                Self::collect(&entry.path(), files);
            }
        }
    }
}

impl FileClassifier for ContentFileClassifier {
    fn classify(&self, paths: &[PathBuf]) -> ClassifiedFiles {
        let mut files = BTreeSet::new();
        for path in paths {
            Self::collect(path, &mut files);
        }

        let mut classified = ClassifiedFiles::default();
        for file in files {
            if guess_format(&file).is_known() {
                classified.nlu_files.push(file);
            } else if is_story_file(&file) {
                classified.story_files.push(file);
            } else {
                tracing::debug!(path = %file.display(), "Ignoring file that is neither stories nor NLU data");
            }
        }

        tracing::debug!(
            stories = classified.story_files.len(),
            nlu = classified.nlu_files.len(),
            "Classified training files"
        );
        classified
    }
}

/// Whether `path` looks like a Markdown story file
pub fn is_story_file(path: &Path) -> bool {
    let is_markdown = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(STORY_EXTENSION))
        .unwrap_or(false);
    if !is_markdown {
        return false;
    }

    let Ok(content) = fs::read_to_string(path) else {
        return false;
    };

    let mut has_header = false;
    let mut has_story_line = false;
    for line in content.lines().map(str::trim_start) {
        if line.starts_with("##") {
            has_header = true;
        } else if line.starts_with('*') || line.starts_with('-') || line.starts_with('>') {
            has_story_line = true;
        }
        if has_header && has_story_line {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_classifies_directory_tree() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir_all(data.join("core")).unwrap();
        std::fs::create_dir_all(data.join(".cache")).unwrap();

        std::fs::write(data.join("nlu.md"), "## intent:greet\n- hi\n").unwrap();
        std::fs::write(
            data.join("nlu.json"),
            r#"{"rasa_nlu_data": {"common_examples": []}}"#,
        )
        .unwrap();
        std::fs::write(data.join("core/stories.md"), "## s\n* greet\n  - utter_greet\n").unwrap();
        std::fs::write(data.join(".cache/stories.md"), "## s\n* greet\n").unwrap();
        std::fs::write(data.join("README.md"), "# Data\nSome words\n").unwrap();

        let classified = ContentFileClassifier::new().classify(&[data.clone()]);
        assert_eq!(
            classified.nlu_files,
            vec![data.join("nlu.json"), data.join("nlu.md")]
        );
        assert_eq!(classified.story_files, vec![data.join("core/stories.md")]);
    }

    #[test]
    fn test_missing_and_duplicate_paths() {
        let dir = tempdir().unwrap();
        let stories = dir.path().join("stories.md");
        std::fs::write(&stories, "## s\n> check\n").unwrap();

        let classified = ContentFileClassifier::new().classify(&[
            stories.clone(),
            dir.path().join("missing"),
            stories.clone(),
            dir.path().to_path_buf(),
        ]);
        assert_eq!(classified.story_files, vec![stories]);
        assert!(classified.nlu_files.is_empty());
    }

    #[test]
    fn test_story_detection_needs_markdown() {
        let dir = tempdir().unwrap();
        let txt = dir.path().join("stories.txt");
        std::fs::write(&txt, "## s\n* greet\n").unwrap();
        assert!(!is_story_file(&txt));

        let empty = ContentFileClassifier::new().classify(&[]);
        assert!(empty.is_empty());
    }
}
