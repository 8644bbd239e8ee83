// File: form-checker/core/src/presenter.rs
// Purpose: Presentation side effects requested by the checker

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where and how a field's error is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorSlot<'a> {
    /// Element receiving the message instead of the default slot next to the field
    pub target: Option<&'a str>,
    /// Class toggled on the field
    pub error_class: &'a str,
    pub animation: Duration,
}

/// An error to show on a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice<'a> {
    pub message: &'a str,
    /// Rendered message markup; `None` means only the error class is applied
    pub markup: Option<String>,
    pub slot: ErrorSlot<'a>,
}

/// Display side of the host form.
///
/// The checker never waits on a presenter: animations are fire and forget.
pub trait Presenter<F> {
    fn show_error(&mut self, field: &F, notice: &ErrorNotice<'_>);

    fn clear_error(&mut self, field: &F, slot: &ErrorSlot<'_>);

    fn update_counter(&mut self, target: &str, text: &str, is_error: bool);

    fn update_strength_display(&mut self, target: &str, label: &str, score_class: &str);

    fn mark_form_error(&mut self, container: &str, message: &str);

    fn scroll_and_focus(&mut self, field: &F, duration: Duration);

    /// Append the required marker markup next to a field
    fn mark_required(&mut self, _field: &F, _markup: &str) {}

    /// Show the title hint inside an empty field
    fn show_placeholder(&mut self, _field: &F, _title: &str, _empty_class: &str) {}

    /// Remove the title hint from a field
    fn hide_placeholder(&mut self, _field: &F, _empty_class: &str) {}
}

/// A recorded presentation side effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "camelCase")]
pub enum Effect<F> {
    ShowError {
        field: F,
        message: String,
        markup: Option<String>,
        target: Option<String>,
        class: String,
        animation: u64,
    },
    ClearError {
        field: F,
        target: Option<String>,
        class: String,
        animation: u64,
    },
    UpdateCounter {
        target: String,
        text: String,
        error: bool,
    },
    UpdateStrength {
        target: String,
        label: String,
        class: String,
    },
    MarkFormError {
        container: String,
        message: String,
    },
    ScrollAndFocus {
        field: F,
        duration: u64,
    },
    MarkRequired {
        field: F,
        markup: String,
    },
    ShowPlaceholder {
        field: F,
        title: String,
        class: String,
    },
    HidePlaceholder {
        field: F,
        class: String,
    },
}

/// Presenter that records every effect, for glue code to replay and for tests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EffectLog<F> {
    effects: Vec<Effect<F>>,
}

impl<F> EffectLog<F> {
    pub fn new() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    pub fn effects(&self) -> &[Effect<F>] {
        &self.effects
    }

    pub fn take(&mut self) -> Vec<Effect<F>> {
        std::mem::take(&mut self.effects)
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl<F: PartialEq> EffectLog<F> {
    /// Message of the most recent error shown on a field, if it is still shown
    pub fn current_error(&self, field: &F) -> Option<&str> {
        self.effects.iter().rev().find_map(|effect| match effect {
            Effect::ShowError {
                field: shown,
                message,
                ..
            } if shown == field => Some(Some(message.as_str())),
            Effect::ClearError { field: cleared, .. } if cleared == field => Some(None),
            _ => None,
        })?
    }

    /// Latest text written to a counter element
    pub fn counter_text(&self, target: &str) -> Option<(&str, bool)> {
        self.effects.iter().rev().find_map(|effect| match effect {
            Effect::UpdateCounter {
                target: t,
                text,
                error,
            } if t == target => Some((text.as_str(), *error)),
            _ => None,
        })
    }

    /// Latest label and class written to a strength element
    pub fn strength_display(&self, target: &str) -> Option<(&str, &str)> {
        self.effects.iter().rev().find_map(|effect| match effect {
            Effect::UpdateStrength {
                target: t,
                label,
                class,
            } if t == target => Some((label.as_str(), class.as_str())),
            _ => None,
        })
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl<F: Clone> Presenter<F> for EffectLog<F> {
    fn show_error(&mut self, field: &F, notice: &ErrorNotice<'_>) {
        self.effects.push(Effect::ShowError {
            field: field.clone(),
            message: notice.message.to_string(),
            markup: notice.markup.clone(),
            target: notice.slot.target.map(str::to_string),
            class: notice.slot.error_class.to_string(),
            animation: millis(notice.slot.animation),
        });
    }

    fn clear_error(&mut self, field: &F, slot: &ErrorSlot<'_>) {
        self.effects.push(Effect::ClearError {
            field: field.clone(),
            target: slot.target.map(str::to_string),
            class: slot.error_class.to_string(),
            animation: millis(slot.animation),
        });
    }

    fn update_counter(&mut self, target: &str, text: &str, is_error: bool) {
        self.effects.push(Effect::UpdateCounter {
            target: target.to_string(),
            text: text.to_string(),
            error: is_error,
        });
    }

    fn update_strength_display(&mut self, target: &str, label: &str, score_class: &str) {
        self.effects.push(Effect::UpdateStrength {
            target: target.to_string(),
            label: label.to_string(),
            class: score_class.to_string(),
        });
    }

    fn mark_form_error(&mut self, container: &str, message: &str) {
        self.effects.push(Effect::MarkFormError {
            container: container.to_string(),
            message: message.to_string(),
        });
    }

    fn scroll_and_focus(&mut self, field: &F, duration: Duration) {
        self.effects.push(Effect::ScrollAndFocus {
            field: field.clone(),
            duration: millis(duration),
        });
    }

    fn mark_required(&mut self, field: &F, markup: &str) {
        self.effects.push(Effect::MarkRequired {
            field: field.clone(),
            markup: markup.to_string(),
        });
    }

    fn show_placeholder(&mut self, field: &F, title: &str, empty_class: &str) {
        self.effects.push(Effect::ShowPlaceholder {
            field: field.clone(),
            title: title.to_string(),
            class: empty_class.to_string(),
        });
    }

    fn hide_placeholder(&mut self, field: &F, empty_class: &str) {
        self.effects.push(Effect::HidePlaceholder {
            field: field.clone(),
            class: empty_class.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn slot() -> ErrorSlot<'static> {
        ErrorSlot {
            target: None,
            error_class: "error",
            animation: Duration::from_millis(250),
        }
    }

    #[test]
    fn test_current_error_tracks_show_and_clear() {
        let mut log: EffectLog<usize> = EffectLog::new();
        assert_eq!(log.current_error(&0), None);

        log.show_error(
            &0,
            &ErrorNotice {
                message: "Required",
                markup: None,
                slot: slot(),
            },
        );
        assert_eq!(log.current_error(&0), Some("Required"));
        assert_eq!(log.current_error(&1), None);

        log.clear_error(&0, &slot());
        assert_eq!(log.current_error(&0), None);
    }

    #[test]
    fn test_effects_serialize_tagged() {
        let mut log: EffectLog<usize> = EffectLog::new();
        log.update_counter("count", "3 <= 10", false);

        let json = serde_json::to_value(log.effects()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "effect": "updateCounter", "target": "count", "text": "3 <= 10", "error": false }
            ])
        );
        assert_eq!(log.take().len(), 1);
        assert!(log.is_empty());
    }
}
