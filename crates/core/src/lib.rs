//! Core traits and types for the dialogue training-data importer
//!
//! This crate provides foundational types used across all other crates:
//! - Error types and the `LoadOutcome` tri-state for degradable loads
//! - Parsed user messages and entities
//! - NLU training data (`TrainingData`, `Message`)
//! - Capability traits for pluggable collaborators (interpreter,
//!   NLU format parser, file classifier)

pub mod error;
pub mod message;
pub mod outcome;
pub mod training_data;
pub mod traits;

pub use error::{ImportError, Result};
pub use message::{Entity, IntentPrediction, ParsedMessage};
pub use outcome::LoadOutcome;
pub use training_data::{LookupTable, Message, RegexFeature, TrainingData, DEFAULT_LANGUAGE};

pub use traits::{ClassifiedFiles, FileClassifier, Interpreter, NluFormatParser};
