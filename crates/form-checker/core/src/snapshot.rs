// File: form-checker/core/src/snapshot.rs
// Purpose: Serializable in-memory form implementing FieldAccessor

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::field::{attrs, FieldAccessor, FieldKind};

/// One control of a form snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub checked: bool,
    /// Trigger markers (CSS classes)
    #[serde(default)]
    pub classes: Vec<String>,
    /// Other attributes, `data-*` included
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Toggles nested in a group container
    #[serde(default)]
    pub children: Vec<FieldSnapshot>,
}

impl FieldSnapshot {
    pub fn new(kind: FieldKind, id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            kind,
            ..Default::default()
        }
    }

    pub fn text(id: &str) -> Self {
        Self::new(FieldKind::Text, id)
    }

    pub fn checkbox(id: &str) -> Self {
        Self::new(FieldKind::Checkbox, id)
    }

    pub fn radio(id: &str, name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::new(FieldKind::Radio, id)
        }
    }

    pub fn group(id: &str, children: Vec<FieldSnapshot>) -> Self {
        Self {
            children,
            ..Self::new(FieldKind::Group, id)
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }
}

/// A whole form: fields in document order plus the ids of auxiliary
/// elements (counters, strength labels, message containers) present on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub fields: Vec<FieldSnapshot>,
    #[serde(default)]
    pub elements: BTreeSet<String>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: FieldSnapshot) -> Self {
        self.fields.push(field);
        self
    }

    pub fn element(mut self, id: &str) -> Self {
        self.elements.insert(id.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Index of the field with the given id
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field.id.as_deref() == Some(id))
    }

    pub fn get(&self, index: usize) -> Option<&FieldSnapshot> {
        self.fields.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut FieldSnapshot> {
        self.fields.get_mut(index)
    }

    /// Set a field's value; returns false if there is no such field
    pub fn set_value(&mut self, index: usize, value: &str) -> bool {
        match self.fields.get_mut(index) {
            Some(field) => {
                field.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_checked(&mut self, index: usize, checked: bool) -> bool {
        match self.fields.get_mut(index) {
            Some(field) => {
                field.checked = checked;
                true
            }
            None => false,
        }
    }
}

impl FieldAccessor for FormSnapshot {
    type Field = usize;

    fn fields(&self) -> Vec<usize> {
        (0..self.fields.len()).collect()
    }

    fn find(&self, id: &str) -> Option<usize> {
        self.index_of(id)
    }

    fn element_exists(&self, id: &str) -> bool {
        self.elements.contains(id) || self.index_of(id).is_some()
    }

    fn kind(&self, field: &usize) -> FieldKind {
        self.get(*field).map(|f| f.kind).unwrap_or_default()
    }

    fn value(&self, field: &usize) -> String {
        self.get(*field).map(|f| f.value.clone()).unwrap_or_default()
    }

    fn is_checked(&self, field: &usize) -> bool {
        self.get(*field).map(|f| f.checked).unwrap_or(false)
    }

    fn has_marker(&self, field: &usize, marker: &str) -> bool {
        self.get(*field)
            .map(|f| f.classes.iter().any(|class| class == marker))
            .unwrap_or(false)
    }

    fn attribute(&self, field: &usize, name: &str) -> Option<String> {
        let field = self.get(*field)?;
        match name {
            attrs::NAME => field.name.clone(),
            "id" => field.id.clone(),
            _ => field.attributes.get(name).cloned(),
        }
    }

    fn field_group(&self, name: &str) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.name.as_deref() == Some(name))
            .map(|(index, _)| index)
            .collect()
    }

    fn descendant_toggles(&self, field: &usize) -> Vec<bool> {
        self.get(*field)
            .map(|f| {
                f.children
                    .iter()
                    .filter(|child| matches!(child.kind, FieldKind::Checkbox | FieldKind::Radio))
                    .map(|child| child.checked)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn form_attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn form() -> FormSnapshot {
        FormSnapshot::new()
            .field(FieldSnapshot::text("name").with_class("required").with_value("Ada"))
            .field(FieldSnapshot::radio("yes", "answer"))
            .field(FieldSnapshot::radio("no", "answer").checked())
            .field(FieldSnapshot::group(
                "toppings",
                vec![
                    FieldSnapshot::checkbox("cheese"),
                    FieldSnapshot::text("note"),
                    FieldSnapshot::checkbox("ham").checked(),
                ],
            ))
            .element("counter")
    }

    #[test]
    fn test_accessor_basics() {
        let form = form();
        assert_eq!(form.fields(), vec![0, 1, 2, 3]);
        assert_eq!(form.find("no"), Some(2));
        assert_eq!(form.value(&0), "Ada");
        assert!(form.has_marker(&0, "required"));
        assert!(!form.has_marker(&0, "email"));
        assert_eq!(form.name(&1).as_deref(), Some("answer"));
        assert_eq!(form.field_group("answer"), vec![1, 2]);
        assert_eq!(form.descendant_toggles(&3), vec![false, true]);
        assert!(form.element_exists("counter"));
        assert!(form.element_exists("name"));
        assert!(!form.element_exists("missing"));
    }

    #[test]
    fn test_out_of_range_field_is_harmless() {
        let form = form();
        assert_eq!(form.value(&42), "");
        assert_eq!(form.kind(&42), FieldKind::Text);
        assert!(form.descendant_toggles(&42).is_empty());
    }

    #[test]
    fn test_snapshot_from_json() {
        let form: FormSnapshot = serde_json::from_str(
            r##"{
                "attributes": { "data-err-elm": "#form-errors" },
                "elements": ["form-errors"],
                "fields": [
                    { "id": "email", "classes": ["required", "email"], "value": "a@b.io" },
                    { "id": "agree", "kind": "checkbox", "checked": true }
                ]
            }"##,
        )
        .unwrap();

        assert_eq!(form.kind(&1), FieldKind::Checkbox);
        assert!(form.is_checked(&1));
        assert_eq!(form.form_attribute("data-err-elm").as_deref(), Some("#form-errors"));
    }
}
