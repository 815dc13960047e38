//! Default file importer
//!
//! One config file, one domain path and a list of mixed training paths.
//! The config is read and the training paths are classified once, at
//! construction; every later call works from that snapshot.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use dialogue_import_config::{Domain, DomainLoader, ImportConfig, ImportSettings};
use dialogue_import_core::{ClassifiedFiles, FileClassifier, LoadOutcome, Result, TrainingData};
use dialogue_import_stories::{StoryGraph, StoryGraphBuilder, StoryReadOptions};

use crate::classifier::ContentFileClassifier;
use crate::nlu::NluDataAggregator;
use crate::traits::TrainingFileImporter;

#[derive(Debug, Clone)]
pub struct SimpleFileImporter {
    config: ImportConfig,
    domain_path: Option<PathBuf>,
    files: ClassifiedFiles,
    settings: ImportSettings,
    domain_loader: DomainLoader,
    story_builder: StoryGraphBuilder,
    nlu_aggregator: NluDataAggregator,
}

impl SimpleFileImporter {
    /// Importer with default settings and content-based classification
    pub fn new(
        config_path: Option<&Path>,
        domain_path: Option<&Path>,
        training_paths: &[PathBuf],
    ) -> Result<Self> {
        Self::with_settings(config_path, domain_path, training_paths, ImportSettings::default())
    }

    pub fn with_settings(
        config_path: Option<&Path>,
        domain_path: Option<&Path>,
        training_paths: &[PathBuf],
        settings: ImportSettings,
    ) -> Result<Self> {
        Self::with_classifier(
            config_path,
            domain_path,
            training_paths,
            settings,
            &ContentFileClassifier::new(),
        )
    }

    pub fn with_classifier(
        config_path: Option<&Path>,
        domain_path: Option<&Path>,
        training_paths: &[PathBuf],
        settings: ImportSettings,
        classifier: &dyn FileClassifier,
    ) -> Result<Self> {
        let config = ImportConfig::load(config_path)?;
        let files = classifier.classify(training_paths);

        tracing::debug!(
            config_keys = config.len(),
            domain = ?domain_path,
            stories = files.story_files.len(),
            nlu = files.nlu_files.len(),
            "Created file importer"
        );

        Ok(Self {
            config,
            domain_path: domain_path.map(Path::to_path_buf),
            files,
            story_builder: StoryGraphBuilder::new().with_domain_checks(settings.check_domain_symbols),
            nlu_aggregator: NluDataAggregator::new().with_policy(settings.nlu_failure_policy),
            domain_loader: DomainLoader::new(),
            settings,
        })
    }

    pub fn story_files(&self) -> &[PathBuf] {
        &self.files.story_files
    }

    pub fn nlu_files(&self) -> &[PathBuf] {
        &self.files.nlu_files
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// Story options carrying the configured exclusion seed
    pub fn story_options(&self) -> StoryReadOptions {
        StoryReadOptions::default().with_seed(self.settings.exclusion_seed)
    }

    /// Load the domain, reporting whether the fallback was used
    pub async fn domain_outcome(&self) -> LoadOutcome<Domain> {
        let loader = self.domain_loader.clone();
        let path = self.domain_path.clone();

        match tokio::task::spawn_blocking(move || loader.load(path.as_deref())).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!(error = %e, "Domain loading task failed. Using empty domain.");
                LoadOutcome::degraded(Domain::empty(), e.to_string())
            }
        }
    }
}

#[async_trait]
impl TrainingFileImporter for SimpleFileImporter {
    async fn get_config(&self) -> ImportConfig {
        self.config.clone()
    }

    async fn get_domain(&self) -> Domain {
        match self.domain_outcome().await {
            LoadOutcome::Loaded(domain) => domain,
            LoadOutcome::Degraded { fallback, .. } => fallback,
            LoadOutcome::Fatal(e) => {
                tracing::debug!(error = %e, "Loading domain failed. Using empty domain.");
                Domain::empty()
            }
        }
    }

    async fn get_story_data(&self, options: &StoryReadOptions) -> Result<StoryGraph> {
        let domain = self.get_domain().await;
        self.story_builder
            .build(&self.files.story_files, &domain, options)
            .await
    }

    async fn get_nlu_data(&self, language: Option<&str>) -> Result<TrainingData> {
        let language = language.unwrap_or(self.settings.default_language.as_str());
        self.nlu_aggregator
            .load(&self.files.nlu_files, language)
            .await
    }

    fn name(&self) -> &str {
        "SimpleFileImporter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_nothing_given() {
        let importer = SimpleFileImporter::new(None, None, &[]).unwrap();

        assert!(importer.get_config().await.is_empty());
        assert!(importer.get_domain().await.is_empty());
        assert!(importer.domain_outcome().await.is_degraded());
        assert!(importer
            .get_story_data(&StoryReadOptions::default())
            .await
            .unwrap()
            .is_empty());
        let nlu = importer.get_nlu_data(None).await.unwrap();
        assert!(nlu.is_empty());
        assert_eq!(nlu.language, "en");
    }

    #[tokio::test]
    async fn test_settings_flow_through() {
        let dir = tempdir().unwrap();
        let nlu = dir.path().join("nlu.md");
        std::fs::write(&nlu, "## intent:greet\n- hallo\n").unwrap();

        let mut settings = ImportSettings::default();
        settings.default_language = "de".to_string();
        settings.exclusion_seed = 7;

        let importer =
            SimpleFileImporter::with_settings(None, None, &[dir.path().to_path_buf()], settings)
                .unwrap();
        assert_eq!(importer.nlu_files(), &[nlu]);
        assert_eq!(importer.get_nlu_data(None).await.unwrap().language, "de");
        assert_eq!(importer.get_nlu_data(Some("fr")).await.unwrap().language, "fr");
        assert_eq!(importer.story_options().exclusion_seed, 7);
    }

    #[tokio::test]
    async fn test_malformed_config_fails_construction() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config.yml");
        std::fs::write(&config, "language: [unclosed\n").unwrap();

        assert!(SimpleFileImporter::new(Some(&config), None, &[]).is_err());
    }

    #[tokio::test]
    async fn test_domain_loaded_once_valid() {
        let dir = tempdir().unwrap();
        let domain = dir.path().join("domain.yml");
        std::fs::write(&domain, "intents: [greet]\nactions: [utter_greet]\n").unwrap();

        let importer = SimpleFileImporter::new(None, Some(&domain), &[]).unwrap();
        assert!(importer.domain_outcome().await.is_loaded());
        assert_eq!(importer.get_domain().await, importer.get_domain().await);
    }
}
