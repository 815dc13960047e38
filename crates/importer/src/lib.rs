//! Training file importers
//!
//! Every importer answers the same four questions for a trainer:
//! the config mapping, the domain, the story graph and the NLU data.
//! Trainers depend on [`TrainingFileImporter`] only, so the number of
//! sources and their formats stay hidden behind it.
//!
//! # Importers
//!
//! - [`SimpleFileImporter`]: one config file, one domain path and a list of
//!   training paths classified once into story and NLU files
//! - [`CombinedDataImporter`]: merges the answers of several importers
//! - [`NluDataImporter`] / [`CoreDataImporter`]: restrict another importer
//!   to NLU-only or dialogue-only data
//!
//! # Example
//!
//! ```ignore
//! use dialogue_import_importer::{load_from_config, TrainingFileImporter};
//! use dialogue_import_stories::StoryReadOptions;
//!
//! let importer = load_from_config(Some(config), Some(domain), &paths)?;
//! let domain = importer.get_domain().await;
//! let stories = importer.get_story_data(&StoryReadOptions::default()).await?;
//! let nlu = importer.get_nlu_data(None).await?;
//! ```

pub mod classifier;
pub mod combined;
pub mod loader;
pub mod nlu;
pub mod restricted;
pub mod simple;
pub mod telemetry;
pub mod traits;

pub use classifier::{is_story_file, ContentFileClassifier};
pub use combined::CombinedDataImporter;
pub use loader::{
    importer_from_name, load_core_importer_from_config, load_from_config,
    load_from_config_with_settings, load_nlu_importer_from_config,
};
pub use nlu::NluDataAggregator;
pub use restricted::{CoreDataImporter, NluDataImporter};
pub use simple::SimpleFileImporter;
pub use telemetry::init_tracing;
pub use traits::TrainingFileImporter;
