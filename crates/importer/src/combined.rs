//! Importer merging several importers
//!
//! Child calls run concurrently. Configs are shallow-merged with later
//! importers winning, domains merged with earlier importers winning,
//! story graphs merged and NLU data concatenated.

use async_trait::async_trait;
use futures::future::join_all;

use dialogue_import_config::{Domain, ImportConfig};
use dialogue_import_core::{Result, TrainingData, DEFAULT_LANGUAGE};
use dialogue_import_stories::{StoryGraph, StoryReadOptions};

use crate::traits::TrainingFileImporter;

pub struct CombinedDataImporter {
    importers: Vec<Box<dyn TrainingFileImporter>>,
}

impl CombinedDataImporter {
    pub fn new(importers: Vec<Box<dyn TrainingFileImporter>>) -> Self {
        Self { importers }
    }

    pub fn len(&self) -> usize {
        self.importers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.importers.is_empty()
    }

    pub fn importer_names(&self) -> Vec<&str> {
        self.importers.iter().map(|i| i.name()).collect()
    }
}

#[async_trait]
impl TrainingFileImporter for CombinedDataImporter {
    async fn get_config(&self) -> ImportConfig {
        join_all(self.importers.iter().map(|i| i.get_config()))
            .await
            .into_iter()
            .fold(ImportConfig::empty(), ImportConfig::merge)
    }

    async fn get_domain(&self) -> Domain {
        join_all(self.importers.iter().map(|i| i.get_domain()))
            .await
            .into_iter()
            .fold(Domain::empty(), Domain::merge)
    }

    async fn get_story_data(&self, options: &StoryReadOptions) -> Result<StoryGraph> {
        let graphs = join_all(self.importers.iter().map(|i| i.get_story_data(options))).await;

        let mut merged = StoryGraph::empty();
        for graph in graphs {
            merged = merged.merge(graph?);
        }
        Ok(merged)
    }

    async fn get_nlu_data(&self, language: Option<&str>) -> Result<TrainingData> {
        let results = join_all(self.importers.iter().map(|i| i.get_nlu_data(language))).await;
        let parts = results.into_iter().collect::<Result<Vec<_>>>()?;

        let language = language
            .map(str::to_string)
            .or_else(|| parts.first().map(|p| p.language.clone()))
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        Ok(TrainingData::merge(language, parts))
    }

    fn name(&self) -> &str {
        "CombinedDataImporter"
    }
}
