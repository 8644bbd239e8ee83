//! Form Checker Core
//!
//! Declarative form validation. Fields opt into rules through trigger
//! markers (CSS classes in HTML) and `data-*` attributes; a [`FormChecker`]
//! attached to a form validates fields on change, keeps counters and
//! strength meters current while typing, and gates submission.
//!
//! The host supplies two collaborators: a [`FieldAccessor`] that reads the
//! form and a [`Presenter`] that displays the results. [`FormSnapshot`] and
//! [`EffectLog`] are ready-made implementations of both.
//!
//! ```
//! use form_checker_core::{EffectLog, FieldSnapshot, FormChecker, FormSnapshot, Options};
//!
//! let form = FormSnapshot::new()
//!     .field(FieldSnapshot::text("email").with_class("required").with_class("email"));
//! let mut checker = FormChecker::attach(form, EffectLog::new(), &Options::default());
//!
//! assert!(!checker.validate_form().is_passed());
//! checker.form_mut().set_value(0, "user@example.com");
//! assert!(checker.validate_form().is_passed());
//! ```

pub mod config;
pub mod error;
pub mod field;
pub mod form;
pub mod outcome;
pub mod presenter;
pub mod rules;
pub mod snapshot;
pub mod submit;
pub mod validator;

pub use config::{Options, Settings, SettingsOverride};
pub use error::{OptionsError, RuleError};
pub use field::{FieldAccessor, FieldConfig, FieldKind};
pub use form::{FormChecker, FormOutcome, FormState, SubmitDecision};
pub use outcome::ValidationOutcome;
pub use presenter::{Effect, EffectLog, ErrorNotice, ErrorSlot, Presenter};
pub use rules::{Rule, RuleInput, RuleKind, RuleOverride, RuleRegistry};
pub use snapshot::{FieldSnapshot, FormSnapshot};
pub use submit::{HookHandle, HookState, SubmitHandler, SubmitHook};
pub use validator::{FieldCheck, FieldValidator};
