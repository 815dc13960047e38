//! Importers restricted to one kind of training data

use async_trait::async_trait;

use dialogue_import_config::{Domain, ImportConfig};
use dialogue_import_core::{Result, TrainingData, DEFAULT_LANGUAGE};
use dialogue_import_stories::{StoryGraph, StoryReadOptions};

use crate::traits::TrainingFileImporter;

/// NLU data only: empty domain and empty story graph
pub struct NluDataImporter {
    inner: Box<dyn TrainingFileImporter>,
}

impl NluDataImporter {
    pub fn new(inner: Box<dyn TrainingFileImporter>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl TrainingFileImporter for NluDataImporter {
    async fn get_config(&self) -> ImportConfig {
        self.inner.get_config().await
    }

    async fn get_domain(&self) -> Domain {
        Domain::empty()
    }

    async fn get_story_data(&self, _options: &StoryReadOptions) -> Result<StoryGraph> {
        Ok(StoryGraph::empty())
    }

    async fn get_nlu_data(&self, language: Option<&str>) -> Result<TrainingData> {
        self.inner.get_nlu_data(language).await
    }

    fn name(&self) -> &str {
        "NluDataImporter"
    }
}

/// Dialogue data only: empty NLU data
pub struct CoreDataImporter {
    inner: Box<dyn TrainingFileImporter>,
}

impl CoreDataImporter {
    pub fn new(inner: Box<dyn TrainingFileImporter>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl TrainingFileImporter for CoreDataImporter {
    async fn get_config(&self) -> ImportConfig {
        self.inner.get_config().await
    }

    async fn get_domain(&self) -> Domain {
        self.inner.get_domain().await
    }

    async fn get_story_data(&self, options: &StoryReadOptions) -> Result<StoryGraph> {
        self.inner.get_story_data(options).await
    }

    async fn get_nlu_data(&self, language: Option<&str>) -> Result<TrainingData> {
        Ok(TrainingData::empty(language.unwrap_or(DEFAULT_LANGUAGE)))
    }

    fn name(&self) -> &str {
        "CoreDataImporter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simple::SimpleFileImporter;
    use tempfile::tempdir;

    fn inner(dir: &std::path::Path) -> Box<dyn TrainingFileImporter> {
        let domain = dir.join("domain.yml");
        std::fs::write(&domain, "intents: [greet]\n").unwrap();
        std::fs::write(dir.join("nlu.md"), "## intent:greet\n- hi\n").unwrap();
        std::fs::write(dir.join("stories.md"), "## s\n* greet\n").unwrap();

        Box::new(SimpleFileImporter::new(None, Some(&domain), &[dir.to_path_buf()]).unwrap())
    }

    #[tokio::test]
    async fn test_nlu_only() {
        let dir = tempdir().unwrap();
        let importer = NluDataImporter::new(inner(dir.path()));

        assert!(importer.get_domain().await.is_empty());
        assert!(importer
            .get_story_data(&StoryReadOptions::default())
            .await
            .unwrap()
            .is_empty());
        assert_eq!(importer.get_nlu_data(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_core_only() {
        let dir = tempdir().unwrap();
        let importer = CoreDataImporter::new(inner(dir.path()));

        assert!(importer.get_domain().await.has_intent("greet"));
        assert_eq!(
            importer
                .get_story_data(&StoryReadOptions::default())
                .await
                .unwrap()
                .len(),
            1
        );
        let nlu = importer.get_nlu_data(Some("de")).await.unwrap();
        assert!(nlu.is_empty());
        assert_eq!(nlu.language, "de");
    }
}
