//! Length rule: bounds classification, error messages and counter text

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::interpolate;
use crate::outcome::ValidationOutcome;

/// Message templates for the length rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthTexts {
    pub min_error: String,
    pub max_error: String,
    pub min_max_error: String,
    pub equal_error: String,
    pub counter_max: String,
    pub counter_min: String,
    pub counter_min_max: String,
    pub counter_equal: String,
}

impl Default for LengthTexts {
    fn default() -> Self {
        Self {
            min_error: "The minimum required number of characters is [[allowed]]".to_string(),
            max_error: "The maximum allowed number of characters is [[allowed]]".to_string(),
            min_max_error: "The number of characters must be between [[min]] and [[max]]"
                .to_string(),
            equal_error: "The number of characters must be [[allowed]]".to_string(),
            counter_max: "[[current]] <= [[max]]".to_string(),
            counter_min: "[[current]] >= [[min]]".to_string(),
            counter_min_max: "[[min]] <= [[current]] <= [[max]]".to_string(),
            counter_equal: "[[current]] == [[equal]]".to_string(),
        }
    }
}

/// Which constraint a pair of optional bounds describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMode {
    Max(usize),
    Min(usize),
    Range { min: usize, max: usize },
    Exact(usize),
    /// No bounds, `min > max`, or a negative bound
    Unenforced,
}

impl LengthMode {
    /// Classify raw attribute bounds.
    ///
    /// A negative minimum disables the two-bound check, and a negative bound
    /// on its own constrains nothing.
    pub fn from_bounds(min: Option<i64>, max: Option<i64>) -> Self {
        let non_negative = |bound: i64| usize::try_from(bound).ok();
        match (min, max) {
            (None, Some(max)) => match non_negative(max) {
                Some(max) => LengthMode::Max(max),
                None => {
                    debug!(max, "negative maximum length, constraint not enforced");
                    LengthMode::Unenforced
                }
            },
            (Some(min), None) => match non_negative(min) {
                Some(min) => LengthMode::Min(min),
                None => LengthMode::Unenforced,
            },
            (Some(min), Some(max)) => match (non_negative(min), non_negative(max)) {
                (Some(min), Some(max)) if max > min => LengthMode::Range { min, max },
                (Some(min), Some(max)) if max == min => LengthMode::Exact(min),
                _ => {
                    debug!(min, max, "length bounds inverted or negative, constraint not enforced");
                    LengthMode::Unenforced
                }
            },
            (None, None) => LengthMode::Unenforced,
        }
    }

    pub fn accepts(&self, len: usize) -> bool {
        match *self {
            LengthMode::Max(max) => len <= max,
            LengthMode::Min(min) => len >= min,
            LengthMode::Range { min, max } => len >= min && len <= max,
            LengthMode::Exact(n) => len == n,
            LengthMode::Unenforced => true,
        }
    }

    pub fn check(&self, len: usize, texts: &LengthTexts) -> ValidationOutcome {
        if self.accepts(len) {
            return ValidationOutcome::Valid;
        }

        let message = match *self {
            LengthMode::Max(max) => interpolate(&texts.max_error, &[("allowed", max.to_string())]),
            LengthMode::Min(min) => interpolate(&texts.min_error, &[("allowed", min.to_string())]),
            LengthMode::Range { min, max } => interpolate(
                &texts.min_max_error,
                &[("min", min.to_string()), ("max", max.to_string())],
            ),
            LengthMode::Exact(n) => interpolate(&texts.equal_error, &[("allowed", n.to_string())]),
            LengthMode::Unenforced => return ValidationOutcome::Valid,
        };

        ValidationOutcome::Invalid(message)
    }

    /// Counter text for the current length, rendered whatever the outcome.
    /// `None` when there is nothing to count against.
    pub fn counter_text(&self, len: usize, texts: &LengthTexts) -> Option<String> {
        let current = ("current", len.to_string());
        let text = match *self {
            LengthMode::Max(max) => {
                interpolate(&texts.counter_max, &[current, ("max", max.to_string())])
            }
            LengthMode::Min(min) => {
                interpolate(&texts.counter_min, &[current, ("min", min.to_string())])
            }
            LengthMode::Range { min, max } => interpolate(
                &texts.counter_min_max,
                &[current, ("min", min.to_string()), ("max", max.to_string())],
            ),
            LengthMode::Exact(n) => interpolate(
                &texts.counter_equal,
                &[
                    current,
                    ("equal", n.to_string()),
                    ("min", n.to_string()),
                    ("max", n.to_string()),
                ],
            ),
            LengthMode::Unenforced => return None,
        };
        Some(text)
    }
}

/// Length as the user perceives it (characters, not bytes)
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(None, Some(5), LengthMode::Max(5))]
    #[case(Some(2), None, LengthMode::Min(2))]
    #[case(Some(2), Some(5), LengthMode::Range { min: 2, max: 5 })]
    #[case(Some(3), Some(3), LengthMode::Exact(3))]
    #[case(Some(6), Some(3), LengthMode::Unenforced)]
    #[case(None, None, LengthMode::Unenforced)]
    #[case(Some(-1), Some(5), LengthMode::Unenforced)]
    #[case(Some(-1), None, LengthMode::Unenforced)]
    #[case(None, Some(-3), LengthMode::Unenforced)]
    fn test_mode_from_bounds(
        #[case] min: Option<i64>,
        #[case] max: Option<i64>,
        #[case] expected: LengthMode,
    ) {
        assert_eq!(LengthMode::from_bounds(min, max), expected);
    }

    #[test]
    fn test_exact_length() {
        let texts = LengthTexts::default();
        let mode = LengthMode::from_bounds(Some(3), Some(3));

        assert!(mode.check(3, &texts).is_valid());
        for len in [2, 4] {
            assert_eq!(
                mode.check(len, &texts),
                ValidationOutcome::invalid("The number of characters must be 3")
            );
        }
    }

    #[test]
    fn test_range_length() {
        let texts = LengthTexts::default();
        let mode = LengthMode::from_bounds(Some(2), Some(5));

        for len in 2..=5 {
            assert!(mode.check(len, &texts).is_valid(), "length {} should pass", len);
        }
        for len in [1, 6] {
            assert_eq!(
                mode.check(len, &texts),
                ValidationOutcome::invalid("The number of characters must be between 2 and 5")
            );
        }
    }

    #[test]
    fn test_single_bound_messages() {
        let texts = LengthTexts::default();
        assert_eq!(
            LengthMode::Max(4).check(5, &texts).message(),
            Some("The maximum allowed number of characters is 4")
        );
        assert_eq!(
            LengthMode::Min(4).check(3, &texts).message(),
            Some("The minimum required number of characters is 4")
        );
    }

    #[test]
    fn test_inverted_bounds_never_fail() {
        let texts = LengthTexts::default();
        let mode = LengthMode::from_bounds(Some(10), Some(2));
        assert!(mode.check(0, &texts).is_valid());
        assert!(mode.check(50, &texts).is_valid());
        assert_eq!(mode.counter_text(4, &texts), None);
    }

    #[test]
    fn test_counter_text_rendered_even_when_valid() {
        let texts = LengthTexts::default();
        assert_eq!(
            LengthMode::Max(10).counter_text(3, &texts).as_deref(),
            Some("3 <= 10")
        );
        assert_eq!(
            LengthMode::Min(2).counter_text(3, &texts).as_deref(),
            Some("3 >= 2")
        );
        assert_eq!(
            LengthMode::Range { min: 2, max: 8 }.counter_text(3, &texts).as_deref(),
            Some("2 <= 3 <= 8")
        );
        assert_eq!(
            LengthMode::Exact(4).counter_text(3, &texts).as_deref(),
            Some("3 == 4")
        );
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(char_len("héllo"), 5);
        assert_eq!(char_len(""), 0);
    }
}
