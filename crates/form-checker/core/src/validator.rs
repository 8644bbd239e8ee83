// File: form-checker/core/src/validator.rs
// Purpose: Validate one field against the rules its markers select

use tracing::{debug, trace};

use crate::config::Settings;
use crate::field::{FieldAccessor, FieldConfig, FieldKind};
use crate::outcome::ValidationOutcome;
use crate::presenter::{ErrorNotice, ErrorSlot, Presenter};
use crate::rules::length::{char_len, LengthMode};
use crate::rules::{strength, Rule, RuleInput, RuleKind, RuleRegistry};

/// Validates single fields.
///
/// Borrowed from the owning checker for the duration of one call.
pub struct FieldValidator<'a> {
    registry: &'a RuleRegistry,
    settings: &'a Settings,
}

/// Result of checking one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCheck<F> {
    pub outcome: ValidationOutcome,
    /// Field referenced by a failed identical check, shown invalid as well
    pub marked: Option<F>,
}

/// First failing rule of a field
struct Failure<F> {
    message: String,
    counterpart: Option<F>,
}

/// What one pass over a field's rules found
struct Scan<F> {
    failure: Option<Failure<F>>,
    /// Field referenced by an identical check that passed
    matched: Option<F>,
}

impl<F> Scan<F> {
    fn failed(failure: Failure<F>) -> Self {
        Self {
            failure: Some(failure),
            matched: None,
        }
    }
}

impl<'a> FieldValidator<'a> {
    pub fn new(registry: &'a RuleRegistry, settings: &'a Settings) -> Self {
        Self { registry, settings }
    }

    /// Validate a field and show or clear its error.
    ///
    /// Order: required check, then every rule whose marker the field carries,
    /// in registry order. The first failure wins.
    pub fn check<A, P>(&self, form: &A, presenter: &mut P, field: &A::Field) -> ValidationOutcome
    where
        A: FieldAccessor,
        P: Presenter<A::Field>,
    {
        self.check_holding(form, presenter, field, &[]).outcome
    }

    /// Validate a field as part of a pass.
    ///
    /// Fields in `held` were marked invalid by an identical check earlier in
    /// the pass; their error stays up even when their own rules pass.
    pub fn check_holding<A, P>(
        &self,
        form: &A,
        presenter: &mut P,
        field: &A::Field,
        held: &[A::Field],
    ) -> FieldCheck<A::Field>
    where
        A: FieldAccessor,
        P: Presenter<A::Field>,
    {
        let config = form.config(field, &self.settings.required_class);

        let scan = match self.required_failure(form, field, &config) {
            Some(failure) => Scan::failed(failure),
            None => self.scan_rules(form, presenter, field, &config, true),
        };

        if let Some(other) = scan.matched.as_ref().filter(|other| *other != field) {
            self.recheck_counterpart(form, presenter, other, held);
        }

        match scan.failure {
            Some(Failure {
                message: rule_message,
                counterpart,
            }) => {
                let message = config.error_text.clone().unwrap_or_else(|| rule_message.clone());
                presenter.show_error(field, &self.notice(&message, &config));

                if let Some(other) = &counterpart {
                    let other_config = form.config(other, &self.settings.required_class);
                    let other_message = other_config.error_text.clone().unwrap_or(rule_message);
                    presenter.show_error(other, &self.notice(&other_message, &other_config));
                }

                trace!(?field, %message, "field invalid");
                FieldCheck {
                    outcome: ValidationOutcome::Invalid(message),
                    marked: counterpart,
                }
            }
            None => {
                if held.contains(field) {
                    trace!(?field, "field held invalid by an identical check");
                } else {
                    presenter.clear_error(field, &self.slot(&config));
                }
                FieldCheck {
                    outcome: ValidationOutcome::Valid,
                    marked: None,
                }
            }
        }
    }

    /// Refresh the live displays (length counter, strength meter) of a field
    /// without reporting errors.
    pub fn refresh_displays<A, P>(&self, form: &A, presenter: &mut P, field: &A::Field)
    where
        A: FieldAccessor,
        P: Presenter<A::Field>,
    {
        let config = form.config(field, &self.settings.required_class);
        let raw = form.value(field);
        let value = config.effective_value(&raw);

        for rule in self.marked_rules(form, field) {
            match &rule.kind {
                RuleKind::Length(_) => {
                    let outcome = rule.evaluate(&RuleInput::new(value, &config));
                    self.update_counter(form, presenter, rule, &config, value, outcome.is_invalid());
                }
                RuleKind::PasswordStrength { .. } => {
                    self.update_strength(form, presenter, rule, &config, value);
                }
                _ => {}
            }
        }
    }

    /// Re-run the own rules of a field whose value an identical check just
    /// matched, lifting a stale mismatch error. Its identical rules are
    /// skipped.
    fn recheck_counterpart<A, P>(
        &self,
        form: &A,
        presenter: &mut P,
        other: &A::Field,
        held: &[A::Field],
    ) where
        A: FieldAccessor,
        P: Presenter<A::Field>,
    {
        let config = form.config(other, &self.settings.required_class);
        let failure = match self.required_failure(form, other, &config) {
            Some(failure) => Some(failure),
            None => self.scan_rules(form, presenter, other, &config, false).failure,
        };

        match failure {
            Some(Failure { message, .. }) => {
                let message = config.error_text.clone().unwrap_or(message);
                presenter.show_error(other, &self.notice(&message, &config));
            }
            None if held.contains(other) => {}
            None => presenter.clear_error(other, &self.slot(&config)),
        }
    }

    fn required_failure<A>(
        &self,
        form: &A,
        field: &A::Field,
        config: &FieldConfig,
    ) -> Option<Failure<A::Field>>
    where
        A: FieldAccessor,
    {
        if !config.required || !self.is_unfilled(form, field, config) {
            return None;
        }
        Some(Failure {
            message: self.settings.empty_error_text.clone(),
            counterpart: None,
        })
    }

    fn is_unfilled<A: FieldAccessor>(&self, form: &A, field: &A::Field, config: &FieldConfig) -> bool {
        match form.kind(field) {
            FieldKind::Checkbox => !form.is_checked(field),
            FieldKind::Radio => {
                let group = match form.name(field) {
                    Some(name) => form.field_group(&name),
                    None => vec![field.clone()],
                };
                !group.iter().any(|member| form.is_checked(member))
            }
            FieldKind::Group => !form.descendant_toggles(field).into_iter().any(|checked| checked),
            FieldKind::Text | FieldKind::TextArea | FieldKind::Select => {
                config.is_blank(&form.value(field))
            }
        }
    }

    fn scan_rules<A, P>(
        &self,
        form: &A,
        presenter: &mut P,
        field: &A::Field,
        config: &FieldConfig,
        with_identical: bool,
    ) -> Scan<A::Field>
    where
        A: FieldAccessor,
        P: Presenter<A::Field>,
    {
        let raw = form.value(field);
        let value = config.effective_value(&raw);
        let is_container = form.kind(field) == FieldKind::Group;
        let mut matched = None;

        for rule in self.marked_rules(form, field) {
            if !with_identical && matches!(rule.kind, RuleKind::Identical) {
                continue;
            }
            // Optional empty fields are not shape-checked, containers always are
            if value.is_empty() && !is_container && !rule.is_container() {
                continue;
            }

            let counterpart_value: Option<String>;
            let toggles: Vec<bool>;
            let mut counterpart = None;
            let mut input = RuleInput::new(value, config);

            match &rule.kind {
                RuleKind::Identical => {
                    counterpart = config.equal_to.as_deref().and_then(|id| form.find(id));
                    if counterpart.is_none() {
                        debug!(rule = %rule.id, "identical target missing, skipping");
                    }
                    counterpart_value = counterpart.as_ref().map(|other| form.value(other));
                    input.counterpart = counterpart_value.as_deref();
                }
                RuleKind::CheckBoxCount => {
                    toggles = form.descendant_toggles(field);
                    input.toggles = &toggles;
                }
                _ => {}
            }

            let outcome = rule.evaluate(&input);

            match &rule.kind {
                RuleKind::Length(_) => {
                    self.update_counter(form, presenter, rule, config, value, outcome.is_invalid());
                }
                RuleKind::PasswordStrength { .. } => {
                    self.update_strength(form, presenter, rule, config, value);
                }
                _ => {}
            }

            match outcome {
                ValidationOutcome::Invalid(message) => {
                    return Scan {
                        failure: Some(Failure {
                            message,
                            counterpart,
                        }),
                        matched,
                    };
                }
                ValidationOutcome::Valid => {
                    if counterpart.is_some() {
                        matched = counterpart;
                    }
                }
            }
        }

        Scan {
            failure: None,
            matched,
        }
    }

    fn marked_rules<'r, A: FieldAccessor>(
        &'r self,
        form: &'r A,
        field: &'r A::Field,
    ) -> impl Iterator<Item = &'a Rule> + 'r {
        self.registry
            .iter()
            .filter(move |rule| form.has_marker(field, &rule.trigger))
    }

    fn update_counter<A, P>(
        &self,
        form: &A,
        presenter: &mut P,
        rule: &Rule,
        config: &FieldConfig,
        value: &str,
        is_error: bool,
    ) where
        A: FieldAccessor,
        P: Presenter<A::Field>,
    {
        let (RuleKind::Length(texts), Some(target)) = (&rule.kind, config.counter_target.as_deref())
        else {
            return;
        };
        if !form.element_exists(target) {
            debug!(element = target, "counter element missing, skipping");
            return;
        }

        let mode = LengthMode::from_bounds(config.min_length, config.max_length);
        if let Some(text) = mode.counter_text(char_len(value), texts) {
            presenter.update_counter(target, &text, is_error);
        }
    }

    fn update_strength<A, P>(
        &self,
        form: &A,
        presenter: &mut P,
        rule: &Rule,
        config: &FieldConfig,
        value: &str,
    ) where
        A: FieldAccessor,
        P: Presenter<A::Field>,
    {
        let (RuleKind::PasswordStrength { labels }, Some(target)) =
            (&rule.kind, config.strength_target.as_deref())
        else {
            return;
        };
        if !form.element_exists(target) {
            debug!(element = target, "strength element missing, skipping");
            return;
        }

        let score = strength::score(value);
        presenter.update_strength_display(target, strength::label(labels, score), &strength::score_class(score));
    }

    fn slot<'c>(&'c self, config: &'c FieldConfig) -> ErrorSlot<'c> {
        ErrorSlot {
            target: config.error_target.as_deref(),
            error_class: &self.settings.error_class,
            animation: self.settings.animation(),
        }
    }

    fn notice<'c>(&'c self, message: &'c str, config: &'c FieldConfig) -> ErrorNotice<'c> {
        ErrorNotice {
            message,
            markup: self.settings.render_error_message(message),
            slot: self.slot(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::{Effect, EffectLog};
    use crate::snapshot::{FieldSnapshot, FormSnapshot};
    use pretty_assertions::assert_eq;

    fn check(form: &FormSnapshot, field: usize) -> (ValidationOutcome, EffectLog<usize>) {
        let registry = RuleRegistry::builtin();
        let settings = Settings::default();
        let mut log = EffectLog::new();
        let outcome = FieldValidator::new(&registry, &settings).check(form, &mut log, &field);
        (outcome, log)
    }

    #[test]
    fn test_required_text_field() {
        let mut form = FormSnapshot::new().field(FieldSnapshot::text("name").with_class("required"));

        let (outcome, log) = check(&form, 0);
        assert_eq!(outcome, ValidationOutcome::invalid("This field is required"));
        assert_eq!(log.current_error(&0), Some("This field is required"));

        form.set_value(0, "Ada");
        let (outcome, log) = check(&form, 0);
        assert_eq!(outcome, ValidationOutcome::Valid);
        assert!(matches!(log.effects(), [Effect::ClearError { field: 0, .. }]));
    }

    #[test]
    fn test_required_checkbox_and_radio_group() {
        let mut form = FormSnapshot::new()
            .field(FieldSnapshot::checkbox("terms").with_class("required"))
            .field(FieldSnapshot::radio("red", "colour").with_class("required"))
            .field(FieldSnapshot::radio("blue", "colour"));

        assert!(check(&form, 0).0.is_invalid());
        assert!(check(&form, 1).0.is_invalid());

        form.set_checked(0, true);
        form.set_checked(2, true);
        assert!(check(&form, 0).0.is_valid());
        assert!(check(&form, 1).0.is_valid(), "another member of the group is checked");
    }

    #[test]
    fn test_title_hint_counts_as_empty() {
        let form = FormSnapshot::new().field(
            FieldSnapshot::text("q")
                .with_class("required")
                .with_attr("title", "Search...")
                .with_value("Search..."),
        );
        assert_eq!(check(&form, 0).0.message(), Some("This field is required"));
    }

    #[test]
    fn test_optional_empty_field_skips_pattern_rules() {
        let form = FormSnapshot::new().field(FieldSnapshot::text("email").with_class("email"));
        assert!(check(&form, 0).0.is_valid());
    }

    #[test]
    fn test_first_failing_rule_wins_in_registry_order() {
        let form = FormSnapshot::new().field(
            FieldSnapshot::text("code")
                .with_class("alphanumeric")
                .with_class("number")
                .with_value("ab-1"),
        );
        // Number is declared before Alphanumeric
        assert_eq!(check(&form, 0).0.message(), Some("This must contain only numbers"));
    }

    #[test]
    fn test_custom_error_text_replaces_rule_message() {
        let form = FormSnapshot::new().field(
            FieldSnapshot::text("email")
                .with_class("required")
                .with_class("email")
                .with_attr("data-err-msg", "We need your email")
                .with_attr("data-err-elm", "#email-error")
                .with_value("nope"),
        );

        let (outcome, log) = check(&form, 0);
        assert_eq!(outcome.message(), Some("We need your email"));
        match &log.effects()[0] {
            Effect::ShowError { target, markup, .. } => {
                assert_eq!(target.as_deref(), Some("email-error"));
                assert_eq!(
                    markup.as_deref(),
                    Some("<p class=\"errorMessage\">We need your email</p>")
                );
            }
            other => panic!("unexpected effect {:?}", other),
        }
    }

    #[test]
    fn test_length_counter_updates_alongside_validation() {
        let form = FormSnapshot::new()
            .field(
                FieldSnapshot::text("bio")
                    .with_class("length")
                    .with_attr("data-max", "5")
                    .with_attr("data-counter", "#bio-count")
                    .with_value("too long"),
            )
            .element("bio-count");

        let (outcome, log) = check(&form, 0);
        assert_eq!(
            outcome.message(),
            Some("The maximum allowed number of characters is 5")
        );
        assert_eq!(log.counter_text("bio-count"), Some(("8 <= 5", true)));
    }

    #[test]
    fn test_negative_min_leaves_length_unenforced() {
        let form = FormSnapshot::new().field(
            FieldSnapshot::text("bio")
                .with_class("length")
                .with_attr("data-min", "-1")
                .with_attr("data-max", "5")
                .with_value("far too long"),
        );
        assert!(check(&form, 0).0.is_valid());
    }

    #[test]
    fn test_missing_counter_element_is_skipped() {
        let form = FormSnapshot::new().field(
            FieldSnapshot::text("bio")
                .with_class("length")
                .with_attr("data-max", "5")
                .with_attr("data-counter", "#nowhere")
                .with_value("abc"),
        );

        let (outcome, log) = check(&form, 0);
        assert!(outcome.is_valid());
        assert_eq!(log.counter_text("nowhere"), None);
    }

    fn password_pair(confirm: &str) -> FormSnapshot {
        FormSnapshot::new()
            .field(FieldSnapshot::text("password").with_value("hunter2"))
            .field(
                FieldSnapshot::text("confirm")
                    .with_class("identical")
                    .with_attr("data-equalto", "#password")
                    .with_value(confirm),
            )
    }

    #[test]
    fn test_identical_marks_and_clears_both_fields() {
        let registry = RuleRegistry::builtin();
        let settings = Settings::default();
        let validator = FieldValidator::new(&registry, &settings);
        let mut log = EffectLog::new();
        let mut form = password_pair("hunter3");

        let outcome = validator.check(&form, &mut log, &1);
        assert_eq!(outcome, ValidationOutcome::invalid("These fields must match"));
        assert_eq!(log.current_error(&1), Some("These fields must match"));
        assert_eq!(log.current_error(&0), Some("These fields must match"));

        form.set_value(1, "hunter2");
        assert!(validator.check(&form, &mut log, &1).is_valid());
        assert_eq!(log.current_error(&1), None);
        assert_eq!(log.current_error(&0), None);
    }

    #[test]
    fn test_identical_match_keeps_counterpart_own_error() {
        let registry = RuleRegistry::builtin();
        let settings = Settings::default();
        let validator = FieldValidator::new(&registry, &settings);
        let mut log = EffectLog::new();
        let mut form = password_pair("hunter3");
        form.get_mut(0).unwrap().classes.push("characters".to_string());

        validator.check(&form, &mut log, &1);
        form.set_value(1, "hunter2");
        assert!(validator.check(&form, &mut log, &1).is_valid());

        assert_eq!(log.current_error(&0), Some("This must contain only characters"));
    }

    #[test]
    fn test_identical_counterpart_gets_rule_message() {
        let mut form = password_pair("hunter3");
        form.get_mut(1)
            .unwrap()
            .attributes
            .insert("data-err-msg".to_string(), "Type the same password twice".to_string());

        let registry = RuleRegistry::builtin();
        let settings = Settings::default();
        let mut log = EffectLog::new();
        let check = FieldValidator::new(&registry, &settings).check_holding(&form, &mut log, &1, &[]);

        assert_eq!(check.marked, Some(0));
        assert_eq!(log.current_error(&1), Some("Type the same password twice"));
        assert_eq!(log.current_error(&0), Some("These fields must match"));
    }

    #[test]
    fn test_held_field_keeps_error_when_own_rules_pass() {
        let form = password_pair("hunter3");
        let registry = RuleRegistry::builtin();
        let settings = Settings::default();
        let validator = FieldValidator::new(&registry, &settings);
        let mut log = EffectLog::new();

        let check = validator.check_holding(&form, &mut log, &1, &[]);
        let held: Vec<usize> = check.marked.into_iter().collect();
        let check = validator.check_holding(&form, &mut log, &0, &held);

        assert!(check.outcome.is_valid());
        assert_eq!(log.current_error(&0), Some("These fields must match"));
    }

    #[test]
    fn test_identical_to_missing_field_is_noop() {
        let form = FormSnapshot::new().field(
            FieldSnapshot::text("confirm")
                .with_class("identical")
                .with_attr("data-equalto", "#ghost")
                .with_value("anything"),
        );

        let (outcome, log) = check(&form, 0);
        assert!(outcome.is_valid());
        assert_eq!(log.effects().len(), 1, "only the clear of the field itself");
    }

    #[test]
    fn test_strength_display_and_threshold() {
        let mut form = FormSnapshot::new()
            .field(
                FieldSnapshot::text("password")
                    .with_class("strength")
                    .with_attr("data-desc", "#meter")
                    .with_attr("data-minstrength", "5")
                    .with_value("abcABC12!"),
            )
            .element("meter");

        let (outcome, log) = check(&form, 0);
        assert_eq!(outcome.message(), Some("Your password is too weak"));
        assert_eq!(log.strength_display("meter"), Some(("Strong", "strength4")));

        form.get_mut(0)
            .unwrap()
            .attributes
            .insert("data-minstrength".to_string(), "4".to_string());
        assert!(check(&form, 0).0.is_valid());
    }

    #[test]
    fn test_refresh_displays_never_reports_errors() {
        let form = FormSnapshot::new()
            .field(
                FieldSnapshot::text("password")
                    .with_class("strength")
                    .with_class("length")
                    .with_attr("data-min", "10")
                    .with_attr("data-counter", "count")
                    .with_attr("data-desc", "meter")
                    .with_attr("data-minstrength", "5")
                    .with_value("abc"),
            )
            .element("count")
            .element("meter");

        let registry = RuleRegistry::builtin();
        let settings = Settings::default();
        let mut log = EffectLog::new();
        FieldValidator::new(&registry, &settings).refresh_displays(&form, &mut log, &0);

        assert_eq!(log.counter_text("count"), Some(("3 >= 10", true)));
        assert_eq!(log.strength_display("meter"), Some(("Very weak", "strength0")));
        assert_eq!(log.current_error(&0), None);
        assert_eq!(log.effects().len(), 2);
    }

    #[test]
    fn test_checkbox_count_container() {
        let mut form = FormSnapshot::new().field(FieldSnapshot::group(
            "toppings",
            vec![FieldSnapshot::checkbox("cheese"), FieldSnapshot::checkbox("ham")],
        )
        .with_class("count"));

        assert_eq!(
            check(&form, 0).0.message(),
            Some("Please select at least one value")
        );

        form.get_mut(0).unwrap().children[1].checked = true;
        assert!(check(&form, 0).0.is_valid());
    }

    #[test]
    fn test_check_is_idempotent() {
        let form = FormSnapshot::new().field(
            FieldSnapshot::text("day").with_class("day").with_value("32"),
        );
        assert_eq!(check(&form, 0).0, check(&form, 0).0);
    }
}
