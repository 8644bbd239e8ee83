// File: form-checker/core/src/outcome.rs
// Purpose: Result of validating one field

use std::fmt;

/// Outcome of a rule or field check.
///
/// An invalid value is an ordinary result, not an error: the message is
/// the text that should be shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(String),
}

impl ValidationOutcome {
    pub fn invalid(message: impl Into<String>) -> Self {
        ValidationOutcome::Invalid(message.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// The error message, if the check failed
    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Valid => None,
            ValidationOutcome::Invalid(message) => Some(message),
        }
    }

    /// Convert into the `Result` shape used by the plain validator functions
    pub fn into_result(self) -> Result<(), String> {
        match self {
            ValidationOutcome::Valid => Ok(()),
            ValidationOutcome::Invalid(message) => Err(message),
        }
    }
}

impl From<Result<(), String>> for ValidationOutcome {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => ValidationOutcome::Valid,
            Err(message) => ValidationOutcome::Invalid(message),
        }
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationOutcome::Valid => write!(f, "valid"),
            ValidationOutcome::Invalid(message) => write!(f, "invalid: {}", message),
        }
    }
}
