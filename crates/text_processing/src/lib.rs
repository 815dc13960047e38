//! Text Processing for the training-data importer
//!
//! This crate provides:
//! - **Interpretation**: the regex interpreter that reads `intent{"entity": "value"}`
//!   syntax, and the shared default instance
//! - **Entity annotations**: Markdown-style `[text](entity)` parsing shared
//!   by NLU files and end-to-end stories
//! - **NLU parsing**: Markdown and JSON NLU training files, plus format
//!   sniffing for file classification
//!
//! # Example
//!
//! ```ignore
//! use dialogue_import_text_processing::{default_interpreter, Interpreter};
//!
//! let parsed = default_interpreter().parse("/greet{\"name\": \"Ada\"}").await;
//! assert_eq!(parsed.intent_name(), Some("greet"));
//! ```

pub mod annotations;
pub mod interpreter;
pub mod nlu;

pub use annotations::{parse_annotated, AnnotatedText};
pub use interpreter::{default_interpreter, parse_intent_syntax, RegexInterpreter};
pub use nlu::{guess_format, NluFileParser, NluFormat};

pub use dialogue_import_core::Interpreter;
