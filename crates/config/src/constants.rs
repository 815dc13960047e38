//! Centralized constants for the importer
//!
//! Single source of truth for names and defaults shared between the domain
//! model, the story reader and the importers.

/// Dialogue domain conventions
pub mod domain {
    /// Prefix of actions that render a response
    pub const UTTER_PREFIX: &str = "utter_";

    /// Actions every domain provides without declaring them
    pub const DEFAULT_ACTIONS: &[&str] = &[
        "action_listen",
        "action_restart",
        "action_default_fallback",
        "action_deactivate_form",
        "action_revert_fallback_events",
        "action_default_ask_affirmation",
        "action_default_ask_rephrase",
        "action_back",
        "action_session_start",
    ];

    /// File extensions recognised as domain files inside a domain directory
    pub const DOMAIN_EXTENSIONS: &[&str] = &["yml", "yaml"];
}

/// Runtime setting defaults
pub mod defaults {
    /// Language used for NLU data when none is requested
    pub const LANGUAGE: &str = dialogue_import_core::DEFAULT_LANGUAGE;

    /// Seed for exclusion sampling
    pub const EXCLUSION_SEED: u64 = 42;

    /// Log level when RUST_LOG is unset
    pub const LOG_LEVEL: &str = "info";

    /// Prefix for environment overrides
    pub const ENV_PREFIX: &str = "DIALOGUE_IMPORT";
}

/// Import config keys
pub mod config_keys {
    pub const LANGUAGE: &str = "language";
    pub const PIPELINE: &str = "pipeline";
    pub const POLICIES: &str = "policies";
    pub const IMPORTERS: &str = "importers";
}
