//! Importer trait

use async_trait::async_trait;

use dialogue_import_config::{Domain, ImportConfig};
use dialogue_import_core::{Result, TrainingData};
use dialogue_import_stories::{StoryGraph, StoryReadOptions};

/// Source of training data for one training run
///
/// Each method can be called on its own, in any order and concurrently.
/// Repeated calls with unchanged inputs return equivalent values.
#[async_trait]
pub trait TrainingFileImporter: Send + Sync {
    /// Config mapping; empty when no config source exists
    async fn get_config(&self) -> ImportConfig;

    /// Domain; the empty domain when it is missing or unusable
    async fn get_domain(&self) -> Domain;

    /// Story graph read against the current domain
    ///
    /// Fails only on invalid options; bad story files are skipped.
    async fn get_story_data(&self, options: &StoryReadOptions) -> Result<StoryGraph>;

    /// NLU training data tagged with `language`, or the default language
    async fn get_nlu_data(&self, language: Option<&str>) -> Result<TrainingData>;

    /// Name for logging
    fn name(&self) -> &str {
        "importer"
    }
}
