//! Form Checker WASM
//!
//! WebAssembly bindings for the form checker. Browser glue serializes the
//! form into a snapshot, calls in, and applies the returned effects to the
//! page.

use form_checker_core::rules::{strength, RuleInput, RuleKind};
use form_checker_core::{
    Effect, EffectLog, FieldConfig, FormChecker, FormOutcome, FormSnapshot, Options,
    RuleRegistry,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result returned to JavaScript
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub valid: bool,
    /// Index of the first invalid field
    pub first_error: Option<usize>,
    /// Presentation effects to apply, in order
    pub effects: Vec<Effect<usize>>,
}

fn parse_snapshot(snapshot: JsValue) -> Result<FormSnapshot, JsValue> {
    serde_wasm_bindgen::from_value(snapshot)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse form snapshot: {}", e)))
}

fn parse_options(options: JsValue) -> Result<Options, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(Options::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse options: {}", e)))
}

fn to_js(report: &CheckReport) -> Result<JsValue, JsValue> {
    Ok(serde_wasm_bindgen::to_value(report)?)
}

type SnapshotChecker = FormChecker<FormSnapshot, EffectLog<usize>>;

fn attach(snapshot: JsValue, options: JsValue) -> Result<SnapshotChecker, JsValue> {
    let form = parse_snapshot(snapshot)?;
    let options = parse_options(options)?;
    let mut checker = FormChecker::attach(form, EffectLog::new(), &options);
    // Attach-time effects are requested separately through `prepareForm`
    checker.presenter_mut().clear();
    Ok(checker)
}

/// Effects the page should apply once when the checker is set up
/// (required markers, initial counters, title hints)
#[wasm_bindgen(js_name = prepareForm)]
pub fn prepare_form(snapshot: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let form = parse_snapshot(snapshot)?;
    let options = parse_options(options)?;
    let checker = FormChecker::attach(form, EffectLog::new(), &options);
    let (_, mut log) = checker.into_parts();

    to_js(&CheckReport {
        valid: true,
        first_error: None,
        effects: log.take(),
    })
}

/// Validate the whole form
///
/// # Example (JavaScript)
/// ```javascript
/// const report = validateForm(snapshot, { settings: { scrollToErrorField: false } });
/// if (!report.valid) event.preventDefault();
/// ```
#[wasm_bindgen(js_name = validateForm)]
pub fn validate_form(snapshot: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let mut checker = attach(snapshot, options)?;
    let outcome = checker.validate_form();
    let (_, mut log) = checker.into_parts();

    let first_error = match outcome {
        FormOutcome::Passed => None,
        FormOutcome::Blocked { first_error } => Some(first_error),
    };
    to_js(&CheckReport {
        valid: first_error.is_none(),
        first_error,
        effects: log.take(),
    })
}

/// Validate one field (change event)
#[wasm_bindgen(js_name = checkField)]
pub fn check_field(snapshot: JsValue, index: usize, options: JsValue) -> Result<JsValue, JsValue> {
    let mut checker = attach(snapshot, options)?;
    let outcome = checker.check_field(&index);
    let (_, mut log) = checker.into_parts();

    to_js(&CheckReport {
        valid: outcome.is_valid(),
        first_error: outcome.is_invalid().then_some(index),
        effects: log.take(),
    })
}

/// Refresh counters and strength meters of one field (key event)
#[wasm_bindgen(js_name = refreshField)]
pub fn refresh_field(snapshot: JsValue, index: usize, options: JsValue) -> Result<JsValue, JsValue> {
    let mut checker = attach(snapshot, options)?;
    checker.on_input(&index);
    let (_, mut log) = checker.into_parts();

    to_js(&CheckReport {
        valid: true,
        first_error: None,
        effects: log.take(),
    })
}

/// Password strength score, 0 to 5
#[wasm_bindgen(js_name = passwordStrength)]
pub fn password_strength(value: &str) -> u8 {
    strength::score(value)
}

/// Quick check of one value against a built-in pattern rule.
/// Unknown ids and non-pattern rules return `None`.
#[wasm_bindgen(js_name = isValid)]
pub fn is_valid(rule_id: &str, value: &str) -> Option<bool> {
    let registry = RuleRegistry::builtin();
    let rule = registry.lookup(rule_id).ok()?;
    if !matches!(rule.kind, RuleKind::Pattern(_)) {
        return None;
    }
    let config = FieldConfig::default();
    Some(rule.evaluate(&RuleInput::new(value, &config)).is_valid())
}
