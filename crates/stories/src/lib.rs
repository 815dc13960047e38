//! Story reading and story graph construction
//!
//! Stories are example conversations written as Markdown-style blocks.
//! This crate turns story files into a single [`StoryGraph`]:
//!
//! - [`reader`]: line-oriented parsing of one story file into [`StoryStep`]s
//! - [`template`]: `{variable}` substitution applied before parsing
//! - [`exclusion`]: reproducible sampling that withholds whole stories
//! - [`graph`]: index-based graph over steps with checkpoint multimaps
//! - [`builder`]: concurrent file reading, skip-and-log of bad files and
//!   domain symbol checks
//!
//! # Example
//!
//! ```ignore
//! use dialogue_import_stories::{StoryGraphBuilder, StoryReadOptions};
//!
//! let graph = StoryGraphBuilder::new()
//!     .build(&story_files, &domain, &StoryReadOptions::default())
//!     .await?;
//! for step in graph.ordered_steps() {
//!     println!("{} ({} events)", step.id, step.events.len());
//! }
//! ```

pub mod builder;
pub mod events;
pub mod exclusion;
pub mod graph;
pub mod options;
pub mod reader;
pub mod step;
pub mod template;

pub use builder::StoryGraphBuilder;
pub use events::StoryEvent;
pub use exclusion::ExclusionSampler;
pub use graph::{Edge, GraphWarning, StoryGraph};
pub use options::StoryReadOptions;
pub use reader::{ParsedStoryFile, StoryFileReader};
pub use step::{Checkpoint, StoryStep, STORY_START};
