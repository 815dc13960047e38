//! NLU format parser trait

use async_trait::async_trait;
use std::path::Path;

use crate::{Result, TrainingData};

/// Parses one NLU training file
///
/// The parser decides what is fatal for a file; the aggregator decides
/// whether a fatal file aborts the whole load.
#[async_trait]
pub trait NluFormatParser: Send + Sync {
    /// Parse the file at `path`, tagging the result with `language`
    async fn parse(&self, path: &Path, language: &str) -> Result<TrainingData>;

    /// Whether this parser recognises the file's format
    fn recognizes(&self, path: &Path) -> bool;
}
