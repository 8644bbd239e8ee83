// File: form-checker/core/src/form.rs
// Purpose: Form-level orchestration: validation passes and submit gating

use tracing::{debug, trace};

use crate::config::{Options, Settings};
use crate::field::{attrs, element_id, FieldAccessor};
use crate::outcome::ValidationOutcome;
use crate::presenter::Presenter;
use crate::rules::RuleRegistry;
use crate::submit::{HookHandle, SubmitHandler, SubmitHook};
use crate::validator::{FieldCheck, FieldValidator};

/// Error state of the current validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState<F> {
    pub has_error: bool,
    /// First invalid field in document order
    pub first_error_field: Option<F>,
}

impl<F> Default for FormState<F> {
    fn default() -> Self {
        Self {
            has_error: false,
            first_error_field: None,
        }
    }
}

impl<F: Clone> FormState<F> {
    pub fn reset(&mut self) {
        self.has_error = false;
        self.first_error_field = None;
    }

    fn record_error(&mut self, field: &F) {
        self.has_error = true;
        if self.first_error_field.is_none() {
            self.first_error_field = Some(field.clone());
        }
    }
}

/// Result of a full validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome<F> {
    Passed,
    Blocked { first_error: F },
}

impl<F> FormOutcome<F> {
    pub fn is_passed(&self) -> bool {
        matches!(self, FormOutcome::Passed)
    }
}

/// What the host should do with the submit event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDecision {
    /// Let the default submit action continue
    Proceed,
    /// Prevent the default submit action
    Block,
}

/// A checker attached to one form.
///
/// Owns its rule registry and settings, so several forms on one page never
/// share overrides.
pub struct FormChecker<A, P>
where
    A: FieldAccessor,
    P: Presenter<A::Field>,
{
    form: A,
    presenter: P,
    registry: RuleRegistry,
    settings: Settings,
    state: FormState<A::Field>,
    hook: SubmitHook,
}

impl<A, P> FormChecker<A, P>
where
    A: FieldAccessor,
    P: Presenter<A::Field>,
{
    /// Attach with the built-in rules
    pub fn attach(form: A, presenter: P, options: &Options) -> Self {
        Self::attach_with_rules(form, presenter, RuleRegistry::builtin(), options)
    }

    /// Attach with a custom rule set; option overrides are merged onto it
    pub fn attach_with_rules(
        form: A,
        presenter: P,
        mut registry: RuleRegistry,
        options: &Options,
    ) -> Self {
        registry.apply_overrides(&options.checks);

        let mut checker = Self {
            form,
            presenter,
            registry,
            settings: options.resolve_settings(),
            state: FormState::default(),
            hook: SubmitHook::new(),
        };
        checker.prepare_fields();
        checker
    }

    /// Required markers, title hints and initial counters
    fn prepare_fields(&mut self) {
        let validator = FieldValidator::new(&self.registry, &self.settings);

        for field in self.form.fields() {
            if !self.settings.asterix.is_empty()
                && self.form.has_marker(&field, &self.settings.required_class)
            {
                self.presenter.mark_required(&field, &self.settings.asterix);
            }

            let kind = self.form.kind(&field);
            if self.settings.update_on_type && kind.is_text_input() {
                validator.refresh_displays(&self.form, &mut self.presenter, &field);
            }
            if kind.takes_placeholder() {
                show_placeholder(&self.form, &mut self.presenter, &self.settings, &field);
            }
        }
    }

    /// Take over the host's existing submit handlers.
    ///
    /// With `blockEvents` on, they are held back and replayed once after a
    /// successful validation. Returns the handlers the host keeps: all of
    /// them when blocking is off, none otherwise.
    pub fn intercept_submit_handlers(
        &mut self,
        handlers: Vec<SubmitHandler>,
    ) -> Vec<SubmitHandler> {
        if !self.settings.block_events {
            return handlers;
        }
        debug!(count = handlers.len(), "intercepting host submit handlers");
        self.hook.capture(handlers);
        Vec::new()
    }

    /// Validate one field and record it in the form state
    pub fn check_field(&mut self, field: &A::Field) -> ValidationOutcome {
        self.check_holding(field, &[]).outcome
    }

    fn check_holding(&mut self, field: &A::Field, held: &[A::Field]) -> FieldCheck<A::Field> {
        let validator = FieldValidator::new(&self.registry, &self.settings);
        let check = validator.check_holding(&self.form, &mut self.presenter, field, held);
        if check.outcome.is_invalid() {
            self.state.record_error(field);
        }
        check
    }

    /// Value changed
    pub fn on_change(&mut self, field: &A::Field) -> Option<ValidationOutcome> {
        if !self.settings.check_on_change {
            return None;
        }
        Some(self.check_field(field))
    }

    /// Key typed: refresh counters and strength meters
    pub fn on_input(&mut self, field: &A::Field) {
        if !self.settings.update_on_type || !self.form.kind(field).is_text_input() {
            return;
        }
        let validator = FieldValidator::new(&self.registry, &self.settings);
        validator.refresh_displays(&self.form, &mut self.presenter, field);
    }

    pub fn on_focus(&mut self, field: &A::Field) {
        hide_placeholder(&self.form, &mut self.presenter, &self.settings, field);
    }

    pub fn on_blur(&mut self, field: &A::Field) {
        show_placeholder(&self.form, &mut self.presenter, &self.settings, field);
    }

    /// Run one validation pass over every field in document order
    pub fn validate_form(&mut self) -> FormOutcome<A::Field> {
        self.state.reset();

        let fields = self.form.fields();
        let mut held = Vec::new();
        for field in &fields {
            if let Some(other) = self.check_holding(field, &held).marked {
                if !held.contains(&other) {
                    held.push(other);
                }
            }
        }

        let first_error = match (self.state.has_error, self.state.first_error_field.clone()) {
            (true, Some(first_error)) => first_error,
            _ => {
                debug!(fields = fields.len(), "form valid");
                return FormOutcome::Passed;
            }
        };

        debug!(fields = fields.len(), ?first_error, "form invalid");

        if self.settings.scroll_to_error_field {
            self.presenter
                .scroll_and_focus(&first_error, self.settings.scroll());
        }

        match self
            .form
            .form_attribute(attrs::ERROR_ELEMENT)
            .and_then(|raw| element_id(&raw))
        {
            Some(container) if self.form.element_exists(&container) => {
                self.presenter
                    .mark_form_error(&container, &self.settings.form_error_text);
            }
            Some(container) => debug!(%container, "form error container missing, skipping"),
            None => {}
        }

        FormOutcome::Blocked { first_error }
    }

    /// Submit attempted.
    ///
    /// Blocks on any invalid field. On success the captured host handlers
    /// run exactly once with this hook suppressed; if there were any, the
    /// default action stays blocked and submitting is left to them.
    pub fn on_submit(&mut self) -> SubmitDecision {
        if self.hook.is_suppressed() {
            trace!("submit hook suppressed, passing through");
            return SubmitDecision::Proceed;
        }

        if let FormOutcome::Blocked { .. } = self.validate_form() {
            return SubmitDecision::Block;
        }

        for field in self.form.fields() {
            hide_placeholder(&self.form, &mut self.presenter, &self.settings, &field);
        }

        if !self.settings.block_events {
            return SubmitDecision::Proceed;
        }

        let replayed = self.hook.replay();
        if replayed > 0 {
            debug!(handlers = replayed, "host submit handlers replayed");
            SubmitDecision::Block
        } else {
            SubmitDecision::Proceed
        }
    }

    pub fn form(&self) -> &A {
        &self.form
    }

    /// Mutable access for hosts whose accessor holds the field values
    pub fn form_mut(&mut self) -> &mut A {
        &mut self.form
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn state(&self) -> &FormState<A::Field> {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn hook(&self) -> &SubmitHook {
        &self.hook
    }

    pub fn hook_handle(&self) -> HookHandle {
        self.hook.handle()
    }

    pub fn into_parts(self) -> (A, P) {
        (self.form, self.presenter)
    }
}

fn show_placeholder<A, P>(form: &A, presenter: &mut P, settings: &Settings, field: &A::Field)
where
    A: FieldAccessor,
    P: Presenter<A::Field>,
{
    if !form.kind(field).takes_placeholder() {
        return;
    }
    if let Some(title) = form.attribute(field, attrs::TITLE).filter(|t| !t.is_empty()) {
        if form.value(field).is_empty() {
            presenter.show_placeholder(field, &title, &settings.empty_class);
        }
    }
}

fn hide_placeholder<A, P>(form: &A, presenter: &mut P, settings: &Settings, field: &A::Field)
where
    A: FieldAccessor,
    P: Presenter<A::Field>,
{
    if !form.kind(field).takes_placeholder() {
        return;
    }
    if let Some(title) = form.attribute(field, attrs::TITLE) {
        if !title.is_empty() && form.value(field) == title {
            presenter.hide_placeholder(field, &settings.empty_class);
        }
    }
}
