// File: form-checker/core/src/error.rs
// Purpose: Error types for registry and options handling

use thiserror::Error;

/// Errors raised by rule registry operations.
///
/// `RuleRegistry::apply_overrides` absorbs all of these with a warning,
/// they only surface through the lower-level calls.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Rule not found: {0}")]
    NotFound(String),

    #[error("Invalid pattern for rule {id}: {source}")]
    InvalidPattern {
        id: String,
        #[source]
        source: regex::Error,
    },

    #[error("Rule {0} is not a pattern rule and cannot take a pattern")]
    PatternOnStatefulRule(String),
}

/// Errors raised while parsing an options document
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Failed to parse JSON options: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML options: {0}")]
    Toml(#[from] toml::de::Error),
}
