//! Dialogue Domain
//!
//! Provides:
//! 1. The domain model (intents, entities, slots, actions, forms, responses)
//! 2. A validator for duplicates and cross-references
//! 3. A loader that falls back to the empty domain instead of failing

mod loader;
mod model;
mod validator;

pub use loader::DomainLoader;
pub use model::{
    Domain, IntentProperties, ResponseVariant, SlotDefinition, SlotType, UseEntities,
};
pub use validator::{
    DomainValidator, ValidationCategory, ValidationError, ValidationResult, ValidationSeverity,
};
