//! NLU data aggregation
//!
//! Parses every NLU file concurrently and concatenates the results. No
//! deduplication: an example present in two files appears twice.

use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;

use dialogue_import_config::NluFailurePolicy;
use dialogue_import_core::{NluFormatParser, Result, TrainingData};
use dialogue_import_text_processing::NluFileParser;

#[derive(Clone)]
pub struct NluDataAggregator {
    parser: Arc<dyn NluFormatParser>,
    policy: NluFailurePolicy,
}

impl Default for NluDataAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl NluDataAggregator {
    pub fn new() -> Self {
        Self {
            parser: Arc::new(NluFileParser::new()),
            policy: NluFailurePolicy::default(),
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn NluFormatParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_policy(mut self, policy: NluFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parse and merge `paths` into one language-tagged set
    pub async fn load(&self, paths: &[PathBuf], language: &str) -> Result<TrainingData> {
        if paths.is_empty() {
            return Ok(TrainingData::empty(language));
        }

        let results = join_all(paths.iter().map(|path| async move {
            (path, self.parser.parse(path, language).await)
        }))
        .await;

        let mut parts = Vec::with_capacity(results.len());
        for (path, result) in results {
            match result {
                Ok(data) => parts.push(data),
                Err(e) => match self.policy {
                    NluFailurePolicy::Fatal => {
                        tracing::error!(path = %path.display(), error = %e, "Failed to load NLU file");
                        return Err(e);
                    }
                    NluFailurePolicy::Skip => {
                        tracing::warn!(path = %path.display(), error = %e, "Skipping NLU file");
                    }
                },
            }
        }

        let merged = TrainingData::merge(language, parts);
        tracing::info!(
            files = paths.len(),
            language = %language,
            examples = merged.len(),
            intents = merged.intents().len(),
            "Loaded NLU data"
        );
        Ok(merged)
    }
}

impl std::fmt::Debug for NluDataAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NluDataAggregator")
            .field("policy", &self.policy)
            .finish()
    }
}
