//! Domain Validator
//!
//! Checks a loaded domain for structural problems and cross-reference gaps:
//! - Duplicate intents, entities, actions and forms (critical)
//! - Intent properties referencing unknown entities or actions
//! - Slot definitions that cannot be featurized
//! - `utter_` actions without a response (warning)
//!
//! # Example
//!
//! ```ignore
//! use dialogue_import_config::domain::DomainValidator;
//!
//! let result = DomainValidator::new().validate("domain.yml", &domain);
//! if !result.is_ok() {
//!     // fall back to an empty domain
//! }
//! ```

use std::collections::HashSet;

use super::model::{Domain, SlotType, UseEntities};

/// Validation error with context
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Category of error
    pub category: ValidationCategory,
    /// Domain section the error was found in
    pub source: String,
    /// Specific field or reference
    pub field: Option<String>,
    /// Error message
    pub message: String,
    /// Severity level
    pub severity: ValidationSeverity,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let field_str = self.field.as_deref().unwrap_or("(root)");
        write!(
            f,
            "[{:?}] {}/{}: {}",
            self.severity, self.source, field_str, self.message
        )
    }
}

impl std::error::Error for ValidationError {}

/// Category of validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCategory {
    /// Referenced definition is missing
    MissingRequired,
    /// Invalid cross-reference
    InvalidReference,
    /// Duplicate definition
    Duplicate,
    /// Definition cannot be used as written
    SchemaMismatch,
}

/// Severity of validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    /// Informational warning
    Warning,
    /// Potential issue
    Error,
    /// Critical - the domain is unusable
    Critical,
}

/// Validation result
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Path or label of the domain being validated
    pub domain: String,
}

impl ValidationResult {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            errors: Vec::new(),
            domain: domain.into(),
        }
    }

    fn push(
        &mut self,
        category: ValidationCategory,
        severity: ValidationSeverity,
        source: &str,
        field: &str,
        message: String,
    ) {
        self.errors.push(ValidationError {
            category,
            source: source.to_string(),
            field: Some(field.to_string()),
            message,
            severity,
        });
    }

    /// Add a duplicate-definition error
    pub fn add_duplicate(&mut self, source: &str, field: &str) {
        self.push(
            ValidationCategory::Duplicate,
            ValidationSeverity::Critical,
            source,
            field,
            format!("'{}' is defined more than once", field),
        );
    }

    /// Add a reference error
    pub fn add_reference_error(&mut self, source: &str, field: &str, message: String) {
        self.push(
            ValidationCategory::InvalidReference,
            ValidationSeverity::Error,
            source,
            field,
            message,
        );
    }

    /// Add a schema error
    pub fn add_schema_error(&mut self, source: &str, field: &str, message: String) {
        self.push(
            ValidationCategory::SchemaMismatch,
            ValidationSeverity::Error,
            source,
            field,
            message,
        );
    }

    /// Add a missing-definition warning
    pub fn add_missing(&mut self, source: &str, field: &str, message: String) {
        self.push(
            ValidationCategory::MissingRequired,
            ValidationSeverity::Warning,
            source,
            field,
            message,
        );
    }

    /// Check if validation passed (no critical errors)
    pub fn is_ok(&self) -> bool {
        !self
            .errors
            .iter()
            .any(|e| e.severity == ValidationSeverity::Critical)
    }

    /// Get only critical errors
    pub fn critical_errors(&self) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|e| e.severity == ValidationSeverity::Critical)
            .collect()
    }

    /// Errors of a given category
    pub fn by_category(&self, category: ValidationCategory) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }

    /// Summary string
    pub fn summary(&self) -> String {
        let count = |severity| self.errors.iter().filter(|e| e.severity == severity).count();

        if self.errors.is_empty() {
            format!("Domain '{}': All validations passed", self.domain)
        } else {
            format!(
                "Domain '{}': {} critical, {} errors, {} warnings",
                self.domain,
                count(ValidationSeverity::Critical),
                count(ValidationSeverity::Error),
                count(ValidationSeverity::Warning)
            )
        }
    }

    /// Emit every finding through `tracing`
    pub fn log(&self) {
        for error in &self.errors {
            match error.severity {
                ValidationSeverity::Warning => tracing::warn!(domain = %self.domain, "{}", error),
                _ => tracing::error!(domain = %self.domain, "{}", error),
            }
        }
    }
}

/// Domain validator
#[derive(Debug, Clone)]
pub struct DomainValidator {
    /// Whether to report missing response templates
    include_warnings: bool,
}

impl Default for DomainValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainValidator {
    pub fn new() -> Self {
        Self {
            include_warnings: true,
        }
    }

    /// Set whether to include warnings
    pub fn with_warnings(mut self, include: bool) -> Self {
        self.include_warnings = include;
        self
    }

    /// Validate a domain
    pub fn validate(&self, label: &str, domain: &Domain) -> ValidationResult {
        let mut result = ValidationResult::new(label);

        self.validate_duplicates(domain, &mut result);
        self.validate_intents(domain, &mut result);
        self.validate_slots(domain, &mut result);
        self.validate_responses(domain, &mut result);

        if self.include_warnings {
            for template in domain.missing_templates() {
                result.add_missing(
                    "actions",
                    template,
                    "Utterance is listed as an action but has no response".to_string(),
                );
            }
        }

        result
    }

    fn validate_duplicates(&self, domain: &Domain, result: &mut ValidationResult) {
        let sections: [(&str, &[String]); 4] = [
            ("intents", domain.intents.as_slice()),
            ("entities", domain.entities.as_slice()),
            ("actions", domain.actions.as_slice()),
            ("forms", domain.forms.as_slice()),
        ];

        for (section, items) in sections {
            let mut seen = HashSet::new();
            let mut reported = HashSet::new();
            for item in items {
                if !seen.insert(item.as_str()) && reported.insert(item.as_str()) {
                    result.add_duplicate(section, item);
                }
            }
        }
    }

    fn validate_intents(&self, domain: &Domain, result: &mut ValidationResult) {
        for (intent, props) in &domain.intent_properties {
            if let UseEntities::Only(entities) = &props.use_entities {
                for entity in entities {
                    if !domain.has_entity(entity) {
                        result.add_reference_error(
                            "intents",
                            intent,
                            format!("use_entities references unknown entity '{}'", entity),
                        );
                    }
                }
            }

            for entity in &props.ignore_entities {
                if !domain.has_entity(entity) {
                    result.add_reference_error(
                        "intents",
                        intent,
                        format!("ignore_entities references unknown entity '{}'", entity),
                    );
                }
            }

            if let Some(action) = &props.triggers {
                if !domain.has_action(action) {
                    result.add_reference_error(
                        "intents",
                        intent,
                        format!("triggers unknown action '{}'", action),
                    );
                }
            }
        }
    }

    fn validate_slots(&self, domain: &Domain, result: &mut ValidationResult) {
        for (name, slot) in &domain.slots {
            if slot.slot_type == SlotType::Categorical && slot.values.is_empty() {
                result.add_schema_error(
                    "slots",
                    name,
                    "Categorical slot must have at least one value".to_string(),
                );
            }

            if let (Some(min), Some(max)) = (slot.min_value, slot.max_value) {
                if min > max {
                    result.add_schema_error(
                        "slots",
                        name,
                        format!("Invalid range: min ({}) > max ({})", min, max),
                    );
                }
            }
        }
    }

    fn validate_responses(&self, domain: &Domain, result: &mut ValidationResult) {
        for (name, variants) in &domain.responses {
            if variants.is_empty() {
                result.add_schema_error("responses", name, "Response has no variants".to_string());
            }
        }
    }
}
