//! Result type for loads that may degrade to a fallback value
//!
//! Domain loading and story file reading never abort an import session on
//! a bad source. Instead of swallowing errors, loaders return a
//! `LoadOutcome` so callers can see whether the value they hold is the real
//! thing, a fallback, or whether the load failed outright.

use crate::ImportError;

#[derive(Debug, Clone)]
pub enum LoadOutcome<T> {
    /// Source loaded successfully
    Loaded(T),
    /// Source could not be used; `fallback` stands in for it
    Degraded { fallback: T, reason: String },
    /// Unrecoverable failure
    Fatal(ImportError),
}

impl<T> LoadOutcome<T> {
    pub fn degraded(fallback: T, reason: impl Into<String>) -> Self {
        Self::Degraded {
            fallback,
            reason: reason.into(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// Reason for degradation, if degraded
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Degraded { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Borrow the usable value (loaded or fallback)
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) | Self::Degraded { fallback: value, .. } => Some(value),
            Self::Fatal(_) => None,
        }
    }

    /// Collapse into a `Result`, accepting fallbacks
    pub fn into_result(self) -> Result<T, ImportError> {
        match self {
            Self::Loaded(value) | Self::Degraded { fallback: value, .. } => Ok(value),
            Self::Fatal(err) => Err(err),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadOutcome<U> {
        match self {
            Self::Loaded(value) => LoadOutcome::Loaded(f(value)),
            Self::Degraded { fallback, reason } => LoadOutcome::Degraded {
                fallback: f(fallback),
                reason,
            },
            Self::Fatal(err) => LoadOutcome::Fatal(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_yields_fallback() {
        let outcome = LoadOutcome::degraded(Vec::<u32>::new(), "file missing");
        assert!(outcome.is_degraded());
        assert_eq!(outcome.reason(), Some("file missing"));
        assert_eq!(outcome.into_result().unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_fatal_becomes_error() {
        let outcome: LoadOutcome<u32> =
            LoadOutcome::Fatal(ImportError::Config("bad".to_string()));
        assert!(outcome.value().is_none());
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn test_map_preserves_variant() {
        let outcome = LoadOutcome::Loaded(2).map(|v| v * 10);
        assert!(outcome.is_loaded());
        assert_eq!(outcome.value(), Some(&20));

        let outcome = LoadOutcome::degraded(1, "x").map(|v| v + 1);
        assert_eq!(outcome.value(), Some(&2));
        assert_eq!(outcome.reason(), Some("x"));
    }
}
