//! Importer construction from config
//!
//! The config's `importers` list names the importers to combine:
//!
//! ```yaml
//! importers:
//!   - name: SimpleFileImporter
//! ```
//!
//! Unknown names are skipped with a warning. When nothing usable is
//! listed the default file importer is used.

use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

use dialogue_import_config::{ImportConfig, ImportSettings};
use dialogue_import_core::{ImportError, Result};

use crate::combined::CombinedDataImporter;
use crate::restricted::{CoreDataImporter, NluDataImporter};
use crate::simple::SimpleFileImporter;
use crate::traits::TrainingFileImporter;

const SIMPLE_IMPORTER_NAMES: &[&str] = &["SimpleFileImporter", "RasaFileImporter"];

/// Build the importer registered under `name`
pub fn importer_from_name(
    name: &str,
    config_path: Option<&Path>,
    domain_path: Option<&Path>,
    training_paths: &[PathBuf],
    settings: &ImportSettings,
) -> Result<Box<dyn TrainingFileImporter>> {
    if SIMPLE_IMPORTER_NAMES.contains(&name) {
        let importer = SimpleFileImporter::with_settings(
            config_path,
            domain_path,
            training_paths,
            settings.clone(),
        )?;
        return Ok(Box::new(importer));
    }
    Err(ImportError::UnknownImporter(name.to_string()))
}

/// Combined importer for the importers listed in the config
pub fn load_from_config(
    config_path: Option<&Path>,
    domain_path: Option<&Path>,
    training_paths: &[PathBuf],
) -> Result<CombinedDataImporter> {
    load_from_config_with_settings(
        config_path,
        domain_path,
        training_paths,
        &ImportSettings::default(),
    )
}

pub fn load_from_config_with_settings(
    config_path: Option<&Path>,
    domain_path: Option<&Path>,
    training_paths: &[PathBuf],
    settings: &ImportSettings,
) -> Result<CombinedDataImporter> {
    let config = ImportConfig::load(config_path)?;

    let mut importers: Vec<Box<dyn TrainingFileImporter>> = Vec::new();
    for entry in config.importers() {
        let Some(name) = entry_name(entry) else {
            tracing::warn!(entry = %entry, "Importer entry has no name, skipping it");
            continue;
        };

        match importer_from_name(name, config_path, domain_path, training_paths, settings) {
            Ok(importer) => importers.push(importer),
            Err(ImportError::UnknownImporter(name)) => {
                tracing::warn!(importer = %name, "Unknown importer, skipping it");
            }
            Err(e) => return Err(e),
        }
    }

    if importers.is_empty() {
        importers.push(Box::new(SimpleFileImporter::with_settings(
            config_path,
            domain_path,
            training_paths,
            settings.clone(),
        )?));
    }

    let combined = CombinedDataImporter::new(importers);
    tracing::debug!(importers = ?combined.importer_names(), "Loaded importers from config");
    Ok(combined)
}

/// Importer for dialogue training only
pub fn load_core_importer_from_config(
    config_path: Option<&Path>,
    domain_path: Option<&Path>,
    training_paths: &[PathBuf],
) -> Result<CoreDataImporter> {
    let importer = load_from_config(config_path, domain_path, training_paths)?;
    Ok(CoreDataImporter::new(Box::new(importer)))
}

/// Importer for NLU training only
pub fn load_nlu_importer_from_config(
    config_path: Option<&Path>,
    domain_path: Option<&Path>,
    training_paths: &[PathBuf],
) -> Result<NluDataImporter> {
    let importer = load_from_config(config_path, domain_path, training_paths)?;
    Ok(NluDataImporter::new(Box::new(importer)))
}

fn entry_name(entry: &JsonValue) -> Option<&str> {
    entry.get("name").and_then(JsonValue::as_str)
}
