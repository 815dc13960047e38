//! Error types shared by all importer crates

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Error, Debug, Clone)]
pub enum ImportError {
    #[error("Failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown importer: {0}")]
    UnknownImporter(String),
}

impl ImportError {
    pub fn io(path: impl AsRef<Path>, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn parse(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Path the error refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_path() {
        let err = ImportError::parse("data/stories.md", "unexpected token");
        assert_eq!(
            err.to_string(),
            "Failed to parse data/stories.md: unexpected token"
        );
        assert_eq!(err.path(), Some(Path::new("data/stories.md")));
    }

    #[test]
    fn test_invalid_argument_has_no_path() {
        let err = ImportError::invalid_argument("exclusion_percentage", "must be <= 100");
        assert!(err.path().is_none());
        assert!(err.to_string().contains("exclusion_percentage"));
    }
}
