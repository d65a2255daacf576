//! Pipeline Error Types
//!
//! Two failures abort a planning run: malformed input and unavailable
//! provider data. Everything else degrades gracefully and is recorded on the
//! plan as a [`Degradation`] annotation.

use serde::{Deserialize, Serialize};

/// Fatal pipeline failure. No partial plan is ever returned alongside one.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// Required input missing or malformed (latitude, longitude, land area)
    #[error("Invalid input for '{field}': {reason}")]
    Validation { field: &'static str, reason: String },

    /// Soil or climate provider failed or timed out
    #[error("{provider} data unavailable: {reason}")]
    DataUnavailable { provider: &'static str, reason: String },
}

impl PlanError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        PlanError::Validation { field, reason: reason.into() }
    }

    pub fn data_unavailable(provider: &'static str, reason: impl Into<String>) -> Self {
        PlanError::DataUnavailable { provider, reason: reason.into() }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, PlanError::Validation { .. })
    }
}

pub type PlanResult<T> = std::result::Result<T, PlanError>;

/// Non-fatal condition: an optional field was missing and a default was used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Degradation {
    /// Input field that was missing or unusable
    pub field: String,

    /// Human-readable annotation, e.g. "soil texture unknown; assumed loamy"
    pub message: String,
}

impl Degradation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PlanError::validation("longitude", "missing");
        assert_eq!(err.to_string(), "Invalid input for 'longitude': missing");
        assert!(err.is_validation());

        let err = PlanError::data_unavailable("soil", "timed out after 2000ms");
        assert_eq!(err.to_string(), "soil data unavailable: timed out after 2000ms");
        assert!(!err.is_validation());
    }
}
