//! Per-request story reading options

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dialogue_import_config::constants::defaults;
use dialogue_import_core::Interpreter;
use dialogue_import_text_processing::default_interpreter;

/// Options for one `get_story_data` request
#[derive(Clone)]
pub struct StoryReadOptions {
    /// Resolves unlabelled user text in end-to-end mode
    pub interpreter: Arc<dyn Interpreter>,
    /// Values for `{variable}` tokens in story lines
    pub template_variables: Option<HashMap<String, String>>,
    /// Read user turns as raw end-to-end text
    pub use_e2e: bool,
    /// Percentage (0..=100) of stories to withhold
    pub exclusion_percentage: Option<u8>,
    /// Seed for exclusion sampling
    pub exclusion_seed: u64,
}

impl Default for StoryReadOptions {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            template_variables: None,
            use_e2e: false,
            exclusion_percentage: None,
            exclusion_seed: defaults::EXCLUSION_SEED,
        }
    }
}

impl StoryReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interpreter(mut self, interpreter: Arc<dyn Interpreter>) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn with_template_variables(mut self, variables: HashMap<String, String>) -> Self {
        self.template_variables = Some(variables);
        self
    }

    pub fn with_e2e(mut self, use_e2e: bool) -> Self {
        self.use_e2e = use_e2e;
        self
    }

    pub fn with_exclusion(mut self, percentage: u8) -> Self {
        self.exclusion_percentage = Some(percentage);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.exclusion_seed = seed;
        self
    }
}

impl fmt::Debug for StoryReadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryReadOptions")
            .field("interpreter", &self.interpreter.name())
            .field("template_variables", &self.template_variables)
            .field("use_e2e", &self.use_e2e)
            .field("exclusion_percentage", &self.exclusion_percentage)
            .field("exclusion_seed", &self.exclusion_seed)
            .finish()
    }
}
