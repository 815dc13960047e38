//! Domain loading with fallback
//!
//! An importer must never block downstream stages because domain metadata
//! is absent (NLU-only training, for instance). Every failure here becomes a
//! `LoadOutcome::Degraded` carrying the empty domain and the reason.

use dialogue_import_core::LoadOutcome;
use std::path::Path;

use super::model::Domain;
use super::validator::DomainValidator;

#[derive(Debug, Clone, Default)]
pub struct DomainLoader {
    validator: DomainValidator,
}

impl DomainLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validator(validator: DomainValidator) -> Self {
        Self { validator }
    }

    /// Load the domain at `path`, falling back to the empty domain
    pub fn load(&self, path: Option<&Path>) -> LoadOutcome<Domain> {
        let Some(path) = path else {
            return Self::fallback("<unset>", "No domain path given".to_string());
        };
        let label = path.display().to_string();

        let domain = match Domain::load(path) {
            Ok(domain) => domain,
            Err(e) => return Self::fallback(&label, e.to_string()),
        };

        let result = self.validator.validate(&label, &domain);
        if !result.is_ok() {
            let reason = result
                .critical_errors()
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Self::fallback(&label, format!("Invalid domain: {}", reason));
        }

        // Missing templates and reference gaps are reported, not fatal
        result.log();

        tracing::debug!(
            path = %label,
            intents = domain.intents.len(),
            actions = domain.actions.len(),
            slots = domain.slots.len(),
            responses = domain.responses.len(),
            "Loaded domain"
        );

        LoadOutcome::Loaded(domain)
    }

    fn fallback(label: &str, reason: String) -> LoadOutcome<Domain> {
        tracing::debug!(
            path = %label,
            reason = %reason,
            "Loading domain failed. Using empty domain."
        );
        LoadOutcome::degraded(Domain::empty(), reason)
    }
}
