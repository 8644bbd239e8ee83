// File: form-checker/core/src/rules/mod.rs
// Purpose: Rule definitions, per-form rule registry and user overrides

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::RuleError;
use crate::field::FieldConfig;
use crate::outcome::ValidationOutcome;

pub mod length;
pub mod patterns;
pub mod strength;

use length::{char_len, LengthMode, LengthTexts};

/// Ids of the built-in rules
pub mod ids {
    pub const EMAIL: &str = "Email";
    pub const URL: &str = "Url";
    pub const IP: &str = "Ip";
    pub const NUMBER: &str = "Number";
    pub const CHARACTERS: &str = "Characters";
    pub const ALPHANUMERIC: &str = "Alphanumeric";
    pub const DAY: &str = "Day";
    pub const MONTH: &str = "Month";
    pub const YEAR: &str = "Year";
    pub const DATE: &str = "Date";
    pub const US_DATE: &str = "UsDate";
    pub const MYSQL_DATE: &str = "MysqlDate";
    pub const LENGTH: &str = "Length";
    pub const IDENTICAL: &str = "Identical";
    pub const PASSWORD_STRENGTH: &str = "PasswordStrength";
    pub const CHECKBOX_COUNT: &str = "CheckBoxCount";
}

/// Replace every `[[name]]` placeholder with its value
pub fn interpolate(template: &str, values: &[(&str, String)]) -> String {
    values.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("[[{}]]", name), value)
    })
}

/// What a rule checks
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Value must match the pattern (empty values always pass)
    Pattern(Regex),
    /// Value length against the field's min/max bounds
    Length(LengthTexts),
    /// Value must equal the value of the field named by `data-equalto`
    Identical,
    /// Score must reach the field's minimum strength, labels indexed by score
    PasswordStrength { labels: Vec<String> },
    /// At least one checkbox or radio inside the container must be selected
    CheckBoxCount,
}

/// A named validation rule, activated on fields carrying its trigger marker
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub trigger: String,
    pub error_text: String,
    pub kind: RuleKind,
}

/// Everything a rule may look at while evaluating one field
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub value: &'a str,
    pub config: &'a FieldConfig,
    /// Value of the referenced field for identical checks, `None` if it doesn't exist
    pub counterpart: Option<&'a str>,
    /// Checked state of the toggles inside a container field
    pub toggles: &'a [bool],
}

impl<'a> RuleInput<'a> {
    pub fn new(value: &'a str, config: &'a FieldConfig) -> Self {
        Self {
            value,
            config,
            counterpart: None,
            toggles: &[],
        }
    }
}

impl Rule {
    pub fn new(id: &str, trigger: &str, error_text: &str, kind: RuleKind) -> Self {
        Self {
            id: id.to_string(),
            trigger: trigger.to_string(),
            error_text: error_text.to_string(),
            kind,
        }
    }

    pub fn pattern(id: &str, trigger: &str, error_text: &str, regex: Regex) -> Self {
        Self::new(id, trigger, error_text, RuleKind::Pattern(regex))
    }

    /// Container rules run even when the field has no value of its own
    pub fn is_container(&self) -> bool {
        matches!(self.kind, RuleKind::CheckBoxCount)
    }

    pub fn evaluate(&self, input: &RuleInput<'_>) -> ValidationOutcome {
        match &self.kind {
            RuleKind::Pattern(regex) => {
                if input.value.is_empty() || regex.is_match(input.value) {
                    ValidationOutcome::Valid
                } else {
                    ValidationOutcome::invalid(&self.error_text)
                }
            }
            RuleKind::Length(texts) => {
                let mode = LengthMode::from_bounds(input.config.min_length, input.config.max_length);
                mode.check(char_len(input.value), texts)
            }
            RuleKind::Identical => match input.counterpart {
                Some(other) if other != input.value => ValidationOutcome::invalid(&self.error_text),
                _ => ValidationOutcome::Valid,
            },
            RuleKind::PasswordStrength { .. } => match input.config.min_strength {
                Some(minimum) if strength::score(input.value) < minimum => {
                    ValidationOutcome::invalid(&self.error_text)
                }
                _ => ValidationOutcome::Valid,
            },
            RuleKind::CheckBoxCount => {
                if input.toggles.iter().any(|&checked| checked) {
                    ValidationOutcome::Valid
                } else {
                    ValidationOutcome::invalid(&self.error_text)
                }
            }
        }
    }

    /// Shallow-merge an override: provided fields replace, the rest stay.
    ///
    /// Nothing is applied when the override carries an unusable pattern.
    pub fn apply_override(&mut self, overrides: &RuleOverride) -> Result<(), RuleError> {
        let pattern = match &overrides.pattern {
            Some(pattern) => {
                if !matches!(self.kind, RuleKind::Pattern(_)) {
                    return Err(RuleError::PatternOnStatefulRule(self.id.clone()));
                }
                Some(Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
                    id: self.id.clone(),
                    source,
                })?)
            }
            None => None,
        };

        if let Some(trigger) = &overrides.trigger {
            self.trigger = trigger.clone();
        }
        if let Some(error_text) = &overrides.error_text {
            self.error_text = error_text.clone();
        }

        match &mut self.kind {
            RuleKind::Pattern(regex) => {
                if let Some(pattern) = pattern {
                    *regex = pattern;
                }
            }
            RuleKind::Length(texts) => overrides.apply_length_texts(texts),
            RuleKind::PasswordStrength { labels } => {
                if let Some(notifications) = &overrides.notifications {
                    *labels = notifications.clone();
                }
            }
            RuleKind::Identical | RuleKind::CheckBoxCount => {}
        }

        Ok(())
    }
}

/// Partial rule fields supplied by the user.
///
/// Both camelCase keys and the legacy PascalCase keys (`ErrorText`,
/// `MinErrorText`, `Class`, ...) are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOverride {
    #[serde(default, alias = "Class", alias = "class")]
    pub trigger: Option<String>,
    #[serde(default, alias = "ErrorText")]
    pub error_text: Option<String>,
    #[serde(default, alias = "Pattern")]
    pub pattern: Option<String>,

    #[serde(default, alias = "MinErrorText")]
    pub min_error_text: Option<String>,
    #[serde(default, alias = "MaxErrorText")]
    pub max_error_text: Option<String>,
    #[serde(default, alias = "MinMaxErrorText")]
    pub min_max_error_text: Option<String>,
    #[serde(default, alias = "EqualErrorText")]
    pub equal_error_text: Option<String>,
    #[serde(default, alias = "CounterTextMax")]
    pub counter_text_max: Option<String>,
    #[serde(default, alias = "CounterTextMin")]
    pub counter_text_min: Option<String>,
    #[serde(default, alias = "CounterTextMinMax")]
    pub counter_text_min_max: Option<String>,
    #[serde(default, alias = "CounterTextEqual")]
    pub counter_text_equal: Option<String>,

    #[serde(default, alias = "Notifications")]
    pub notifications: Option<Vec<String>>,
}

impl RuleOverride {
    fn apply_length_texts(&self, texts: &mut LengthTexts) {
        let pairs = [
            (&self.min_error_text, &mut texts.min_error),
            (&self.max_error_text, &mut texts.max_error),
            (&self.min_max_error_text, &mut texts.min_max_error),
            (&self.equal_error_text, &mut texts.equal_error),
            (&self.counter_text_max, &mut texts.counter_max),
            (&self.counter_text_min, &mut texts.counter_min),
            (&self.counter_text_min_max, &mut texts.counter_min_max),
            (&self.counter_text_equal, &mut texts.counter_equal),
        ];
        for (source, target) in pairs {
            if let Some(text) = source {
                *target = text.clone();
            }
        }
    }
}

/// Ordered set of rules owned by one attached form.
///
/// Declaration order is evaluation order.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleRegistry {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The built-in rule set
    pub fn builtin() -> Self {
        let mut rules = patterns::builtin_patterns();
        rules.push(Rule::new(
            ids::LENGTH,
            "length",
            "",
            RuleKind::Length(LengthTexts::default()),
        ));
        rules.push(Rule::new(
            ids::IDENTICAL,
            "identical",
            "These fields must match",
            RuleKind::Identical,
        ));
        rules.push(Rule::new(
            ids::PASSWORD_STRENGTH,
            "strength",
            "Your password is too weak",
            RuleKind::PasswordStrength {
                labels: strength::default_labels(),
            },
        ));
        rules.push(Rule::new(
            ids::CHECKBOX_COUNT,
            "count",
            "Please select at least one value",
            RuleKind::CheckBoxCount,
        ));
        Self { rules }
    }

    /// Add a rule, replacing any rule with the same id in place
    pub fn register(&mut self, rule: Rule) {
        match self.rules.iter_mut().find(|existing| existing.id == rule.id) {
            Some(existing) => {
                debug!(id = %rule.id, "replacing rule");
                *existing = rule;
            }
            None => self.rules.push(rule),
        }
    }

    pub fn lookup(&self, id: &str) -> Result<&Rule, RuleError> {
        self.rules
            .iter()
            .find(|rule| rule.id == id)
            .ok_or_else(|| RuleError::NotFound(id.to_string()))
    }

    pub fn lookup_mut(&mut self, id: &str) -> Result<&mut Rule, RuleError> {
        self.rules
            .iter_mut()
            .find(|rule| rule.id == id)
            .ok_or_else(|| RuleError::NotFound(id.to_string()))
    }

    /// Merge overrides onto existing rules.
    ///
    /// Only rules already in the registry are touched; unknown ids are
    /// skipped rather than inserted. Problems are logged and ignored.
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, RuleOverride>) {
        for (id, rule_override) in overrides {
            let result = self
                .lookup_mut(id)
                .and_then(|rule| rule.apply_override(rule_override));
            if let Err(error) = result {
                warn!(%error, "ignoring rule override");
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
