//! Capability traits for the importer's external collaborators
//!
//! All pluggable pieces implement these traits so that:
//! - Backends can be swapped without code changes
//! - Tests can substitute fakes
//!
//! # Trait Hierarchy
//!
//! ```text
//! Interpretation:
//!   - Interpreter: raw user text -> intent + entities
//!
//! NLU data:
//!   - NluFormatParser: one NLU file -> TrainingData
//!
//! Discovery:
//!   - FileClassifier: training paths -> story files + NLU files
//! ```

mod classifier;
mod interpreter;
mod nlu_parser;

pub use classifier::{ClassifiedFiles, FileClassifier};
pub use interpreter::Interpreter;
pub use nlu_parser::NluFormatParser;
