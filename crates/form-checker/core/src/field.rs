// File: form-checker/core/src/field.rs
// Purpose: Field kinds, per-field configuration and the host accessor contract

use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute names read from the host markup
pub mod attrs {
    pub const MIN: &str = "data-min";
    pub const MAX: &str = "data-max";
    pub const COUNTER: &str = "data-counter";
    pub const EQUAL_TO: &str = "data-equalto";
    pub const DESC: &str = "data-desc";
    pub const MIN_STRENGTH: &str = "data-minstrength";
    pub const ERROR_MESSAGE: &str = "data-err-msg";
    pub const ERROR_MESSAGE_LEGACY: &str = "data-errmessage";
    pub const ERROR_ELEMENT: &str = "data-err-elm";
    pub const TITLE: &str = "title";
    pub const NAME: &str = "name";
}

/// Kind of form control, which decides what "empty" means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line input (text, email, password, ...)
    #[default]
    Text,
    TextArea,
    Select,
    Checkbox,
    Radio,
    /// Container holding checkboxes or radios (`div.count`)
    Group,
}

impl FieldKind {
    /// Inputs that get live counter and strength updates while typing
    pub fn is_text_input(&self) -> bool {
        matches!(self, FieldKind::Text)
    }

    /// Controls that can show a title placeholder inside them
    pub fn takes_placeholder(&self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::TextArea)
    }
}

/// Per-field configuration extracted from the field's attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub required: bool,
    /// Raw bounds as written; sign handling is left to the length rule
    pub min_length: Option<i64>,
    pub max_length: Option<i64>,
    /// Id of the field this one must equal
    pub equal_to: Option<String>,
    pub min_strength: Option<u8>,
    /// Id of the element showing the length counter
    pub counter_target: Option<String>,
    /// Id of the element showing the strength label
    pub strength_target: Option<String>,
    /// Message shown instead of the failing rule's message
    pub error_text: Option<String>,
    /// Id of the element receiving the error message
    pub error_target: Option<String>,
    /// In-field hint; a value equal to it counts as empty
    pub title: Option<String>,
}

impl FieldConfig {
    /// Build a config from an attribute lookup
    pub fn from_attributes<F>(attribute: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let error_text = attribute(attrs::ERROR_MESSAGE)
            .filter(|text| !text.is_empty())
            .or_else(|| attribute(attrs::ERROR_MESSAGE_LEGACY).filter(|text| !text.is_empty()));

        Self {
            required: false,
            min_length: attribute(attrs::MIN).and_then(|raw| parse_leading_int(&raw)),
            max_length: attribute(attrs::MAX).and_then(|raw| parse_leading_int(&raw)),
            equal_to: attribute(attrs::EQUAL_TO).and_then(|raw| element_id(&raw)),
            min_strength: attribute(attrs::MIN_STRENGTH)
                .and_then(|raw| parse_leading_int(&raw))
                .map(|value| value.clamp(0, i64::from(u8::MAX)) as u8),
            counter_target: attribute(attrs::COUNTER).and_then(|raw| element_id(&raw)),
            strength_target: attribute(attrs::DESC).and_then(|raw| element_id(&raw)),
            error_text,
            error_target: attribute(attrs::ERROR_ELEMENT).and_then(|raw| element_id(&raw)),
            title: attribute(attrs::TITLE).filter(|title| !title.is_empty()),
        }
    }

    /// Whether a raw value should be treated as empty (blank or the title hint)
    pub fn is_blank(&self, value: &str) -> bool {
        value.is_empty() || self.title.as_deref() == Some(value)
    }

    /// The value rules should see: the title hint reads as empty
    pub fn effective_value<'v>(&self, value: &'v str) -> &'v str {
        if self.is_blank(value) {
            ""
        } else {
            value
        }
    }
}

/// Parse an integer the way lenient attribute readers do: optional
/// whitespace and sign, then the leading run of digits.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Normalize an element reference: `#name` and `name` both mean the id `name`
pub fn element_id(raw: &str) -> Option<String> {
    let id = raw.trim().trim_start_matches('#');
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Read access to the host form.
///
/// Implemented by whatever owns the real controls (a DOM binding, a
/// snapshot, a test double). Fields are opaque handles.
pub trait FieldAccessor {
    type Field: Clone + PartialEq + fmt::Debug;

    /// All checkable fields in document order
    fn fields(&self) -> Vec<Self::Field>;

    /// Field with the given id
    fn find(&self, id: &str) -> Option<Self::Field>;

    /// Whether any element (field, counter, description, container) has this id
    fn element_exists(&self, id: &str) -> bool;

    fn kind(&self, field: &Self::Field) -> FieldKind;

    fn value(&self, field: &Self::Field) -> String;

    fn is_checked(&self, field: &Self::Field) -> bool;

    /// Whether the field carries a trigger marker (a class in HTML)
    fn has_marker(&self, field: &Self::Field, marker: &str) -> bool;

    fn attribute(&self, field: &Self::Field, name: &str) -> Option<String>;

    /// Fields sharing a group name (radio buttons)
    fn field_group(&self, name: &str) -> Vec<Self::Field>;

    /// Checked state of every checkbox or radio inside a container field
    fn descendant_toggles(&self, field: &Self::Field) -> Vec<bool>;

    /// Attribute of the form element itself
    fn form_attribute(&self, name: &str) -> Option<String>;

    fn name(&self, field: &Self::Field) -> Option<String> {
        self.attribute(field, attrs::NAME)
    }

    /// Configuration for a field; `required_marker` is the marker meaning "required"
    fn config(&self, field: &Self::Field, required_marker: &str) -> FieldConfig {
        let mut config = FieldConfig::from_attributes(|name| self.attribute(field, name));
        config.required = self.has_marker(field, required_marker);
        config
    }
}
