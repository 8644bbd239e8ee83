// File: form-checker/core/src/config.rs
// Purpose: Checker settings, user options and their merge onto defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::OptionsError;
use crate::rules::{interpolate, RuleOverride};

/// Settings for one attached form.
///
/// Built from defaults, merged with user overrides once at attach time and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Markup appended after required fields (empty disables it)
    #[serde(default = "default_asterix")]
    pub asterix: String,

    /// Error message template, `[[text]]` is replaced by the message.
    /// Empty disables message markup; the error class is still applied.
    #[serde(default = "default_error_message")]
    pub error_message: String,

    #[serde(default = "default_required_class")]
    pub required_class: String,

    #[serde(default = "default_error_class")]
    pub error_class: String,

    /// Class used while a title placeholder is displayed
    #[serde(default = "default_empty_class")]
    pub empty_class: String,

    #[serde(default = "default_true")]
    pub check_on_change: bool,

    /// Refresh counters and strength meters while typing
    #[serde(default = "default_true")]
    pub update_on_type: bool,

    #[serde(default = "default_true")]
    pub scroll_to_error_field: bool,

    /// Slide animation time in milliseconds
    #[serde(default = "default_animation_time")]
    pub animation_time: u64,

    /// Scroll animation time in milliseconds
    #[serde(default = "default_scroll_time")]
    pub scroll_time: u64,

    /// Hold back the host's own submit handlers until the form is valid
    #[serde(default = "default_true")]
    pub block_events: bool,

    #[serde(default = "default_empty_error_text")]
    pub empty_error_text: String,

    #[serde(default = "default_form_error_text")]
    pub form_error_text: String,
}

// Default values
fn default_asterix() -> String {
    "<span class=\"asterix\">*</span>".to_string()
}

fn default_error_message() -> String {
    "<p class=\"errorMessage\">[[text]]</p>".to_string()
}

fn default_required_class() -> String {
    "required".to_string()
}

fn default_error_class() -> String {
    "error".to_string()
}

fn default_empty_class() -> String {
    "empty".to_string()
}

fn default_animation_time() -> u64 {
    250
}

fn default_scroll_time() -> u64 {
    500
}

fn default_empty_error_text() -> String {
    "This field is required".to_string()
}

fn default_form_error_text() -> String {
    "Please check the highlighted fields".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            asterix: default_asterix(),
            error_message: default_error_message(),
            required_class: default_required_class(),
            error_class: default_error_class(),
            empty_class: default_empty_class(),
            check_on_change: true,
            update_on_type: true,
            scroll_to_error_field: true,
            animation_time: default_animation_time(),
            scroll_time: default_scroll_time(),
            block_events: true,
            empty_error_text: default_empty_error_text(),
            form_error_text: default_form_error_text(),
        }
    }
}

impl Settings {
    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_time)
    }

    pub fn scroll(&self) -> Duration {
        Duration::from_millis(self.scroll_time)
    }

    /// Render the error message markup, or `None` when message markup is disabled
    pub fn render_error_message(&self, text: &str) -> Option<String> {
        if self.error_message.is_empty() {
            return None;
        }
        Some(interpolate(&self.error_message, &[("text", text.to_string())]))
    }

    /// Shallow merge: every key present in the override replaces the current value
    pub fn merge(&mut self, overrides: SettingsOverride) {
        let SettingsOverride {
            asterix,
            error_message,
            required_class,
            error_class,
            empty_class,
            check_on_change,
            update_on_type,
            scroll_to_error_field,
            animation_time,
            scroll_time,
            block_events,
            empty_error_text,
            form_error_text,
        } = overrides;

        if let Some(value) = asterix {
            self.asterix = value;
        }
        if let Some(value) = error_message {
            self.error_message = value;
        }
        if let Some(value) = required_class {
            self.required_class = value;
        }
        if let Some(value) = error_class {
            self.error_class = value;
        }
        if let Some(value) = empty_class {
            self.empty_class = value;
        }
        if let Some(value) = check_on_change {
            self.check_on_change = value;
        }
        if let Some(value) = update_on_type {
            self.update_on_type = value;
        }
        if let Some(value) = scroll_to_error_field {
            self.scroll_to_error_field = value;
        }
        if let Some(value) = animation_time {
            self.animation_time = value;
        }
        if let Some(value) = scroll_time {
            self.scroll_time = value;
        }
        if let Some(value) = block_events {
            self.block_events = value;
        }
        if let Some(value) = empty_error_text {
            self.empty_error_text = value;
        }
        if let Some(value) = form_error_text {
            self.form_error_text = value;
        }
    }
}

/// Partial settings supplied by the user; absent keys keep their defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsOverride {
    #[serde(default)]
    pub asterix: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub required_class: Option<String>,
    #[serde(default)]
    pub error_class: Option<String>,
    #[serde(default)]
    pub empty_class: Option<String>,
    #[serde(default)]
    pub check_on_change: Option<bool>,
    #[serde(default)]
    pub update_on_type: Option<bool>,
    #[serde(default)]
    pub scroll_to_error_field: Option<bool>,
    #[serde(default)]
    pub animation_time: Option<u64>,
    #[serde(default)]
    pub scroll_time: Option<u64>,
    #[serde(default)]
    pub block_events: Option<bool>,
    #[serde(default)]
    pub empty_error_text: Option<String>,
    #[serde(default)]
    pub form_error_text: Option<String>,
}

/// Options passed when attaching a checker to a form
///
/// ```json
/// {
///   "settings": { "scrollToErrorField": false },
///   "checks": { "Email": { "errorText": "Bad address" } }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Options {
    #[serde(default)]
    pub settings: SettingsOverride,

    /// Rule overrides keyed by rule id
    #[serde(default)]
    pub checks: BTreeMap<String, RuleOverride>,
}

impl Options {
    pub fn from_json(content: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml(content: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load options from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default options
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let options = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse options file: {:?}", path))?;

        Ok(options)
    }

    /// Settings produced by merging these options onto the defaults
    pub fn resolve_settings(&self) -> Settings {
        let mut settings = Settings::default();
        settings.merge(self.settings.clone());
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.required_class, "required");
        assert_eq!(settings.error_class, "error");
        assert!(settings.check_on_change);
        assert!(settings.block_events);
        assert_eq!(settings.animation(), Duration::from_millis(250));
        assert_eq!(settings.scroll(), Duration::from_millis(500));
        assert_eq!(settings.empty_error_text, "This field is required");
    }

    #[test]
    fn test_merge_replaces_only_given_keys() {
        let mut settings = Settings::default();
        settings.merge(SettingsOverride {
            scroll_to_error_field: Some(false),
            empty_error_text: Some("Required".to_string()),
            ..Default::default()
        });

        assert!(!settings.scroll_to_error_field);
        assert_eq!(settings.empty_error_text, "Required");
        assert_eq!(settings.form_error_text, default_form_error_text());
        assert!(settings.check_on_change);
    }

    #[test]
    fn test_render_error_message() {
        let mut settings = Settings::default();
        assert_eq!(
            settings.render_error_message("Oops").as_deref(),
            Some("<p class=\"errorMessage\">Oops</p>")
        );

        settings.error_message.clear();
        assert_eq!(settings.render_error_message("Oops"), None);
    }

    #[test]
    fn test_options_from_json() {
        let options = Options::from_json(
            r#"{
                "settings": { "blockEvents": false, "animationTime": 100 },
                "checks": { "Email": { "errorText": "Bad address" } }
            }"#,
        )
        .unwrap();

        let settings = options.resolve_settings();
        assert!(!settings.block_events);
        assert_eq!(settings.animation_time, 100);
        assert_eq!(
            options.checks["Email"].error_text.as_deref(),
            Some("Bad address")
        );
    }

    #[test]
    fn test_options_from_toml() {
        let options = Options::from_toml(
            r#"
            [settings]
            formErrorText = "Fix the form"

            [checks.Length]
            MinErrorText = "At least [[allowed]]"
            "#,
        )
        .unwrap();

        assert_eq!(
            options.resolve_settings().form_error_text,
            "Fix the form"
        );
        assert_eq!(
            options.checks["Length"].min_error_text.as_deref(),
            Some("At least [[allowed]]")
        );
    }

    #[test]
    fn test_options_parse_error() {
        assert!(matches!(
            Options::from_json("{ not json"),
            Err(OptionsError::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let options = Options::load("definitely/not/here.toml").unwrap();
        assert!(options.checks.is_empty());
        assert_eq!(options.resolve_settings(), Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checker.toml");
        fs::write(&path, "[settings]\ncheckOnChange = false\n").unwrap();

        let options = Options::load(&path).unwrap();
        assert!(!options.resolve_settings().check_on_change);

        fs::write(&path, "[settings\n").unwrap();
        assert!(Options::load(&path).is_err());
    }
}
