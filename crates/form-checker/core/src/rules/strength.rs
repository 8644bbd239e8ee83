//! Password strength scoring

/// Highest score a password can reach
pub const MAX_SCORE: u8 = 5;

/// Labels shown for scores 0 through 5
pub const DEFAULT_LABELS: [&str; 6] = ["Very weak", "Weak", "Better", "Medium", "Strong", "Strongest"];

/// Score a password from 0 to 5.
///
/// One point each for: longer than 6 characters, mixed case, a digit,
/// a punctuation character, longer than 12 characters.
pub fn score(password: &str) -> u8 {
    let len = password.chars().count();
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| c.is_ascii_punctuation());

    [
        len > 6,
        has_lowercase && has_uppercase,
        has_digit,
        has_special,
        len > 12,
    ]
    .iter()
    .filter(|&&point| point)
    .count() as u8
}

/// Label for a score, clamped to the available labels
pub fn label(labels: &[String], score: u8) -> &str {
    let index = usize::from(score.min(MAX_SCORE));
    labels
        .get(index)
        .or_else(|| labels.last())
        .map(String::as_str)
        .unwrap_or("")
}

/// Style marker for a score, e.g. `strength3`
pub fn score_class(score: u8) -> String {
    format!("strength{}", score.min(MAX_SCORE))
}

pub fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(|label| label.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 0)]
    #[case("abc", 0)]
    #[case("abcdefg", 1)]
    #[case("abcABC", 1)]
    #[case("abcABC12!", 4)]
    #[case("abcABC12!xyz_", 5)]
    #[case("1234567890123", 3)]
    fn test_score(#[case] password: &str, #[case] expected: u8) {
        assert_eq!(score(password), expected);
    }

    #[test]
    fn test_label_lookup() {
        let labels = default_labels();
        assert_eq!(label(&labels, 0), "Very weak");
        assert_eq!(label(&labels, 4), "Strong");
        assert_eq!(label(&labels, 5), "Strongest");
        assert_eq!(label(&labels, 9), "Strongest");
        assert_eq!(label(&labels[..2], 4), "Weak");
        assert_eq!(label(&[], 3), "");
    }

    #[test]
    fn test_score_class() {
        assert_eq!(score_class(2), "strength2");
        assert_eq!(score_class(7), "strength5");
    }
}
