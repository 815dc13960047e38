//! File classifier trait

use std::path::{Path, PathBuf};

/// Training files split by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedFiles {
    pub story_files: Vec<PathBuf>,
    pub nlu_files: Vec<PathBuf>,
}

impl ClassifiedFiles {
    pub fn is_empty(&self) -> bool {
        self.story_files.is_empty() && self.nlu_files.is_empty()
    }
}

/// Splits mixed training paths into story and NLU files
///
/// Classification happens once, when an importer is constructed, so the
/// trait is synchronous.
pub trait FileClassifier: Send + Sync {
    fn classify(&self, paths: &[PathBuf]) -> ClassifiedFiles;

    /// Classify a single path
    fn classify_one(&self, path: &Path) -> ClassifiedFiles {
        self.classify(&[path.to_path_buf()])
    }
}
