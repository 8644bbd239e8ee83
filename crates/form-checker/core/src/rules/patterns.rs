//! Built-in pattern rules
//!
//! All patterns are case-insensitive. Most of them accept the empty string
//! on their own, and `Rule::evaluate` passes empty values for every pattern
//! rule anyway: required-ness is checked separately.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ids, Rule};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[_a-z0-9-]+(\.[_a-z0-9-]+)*@[a-z0-9-]+(\.[a-z0-9-]+)*(\.[a-z]{2,4})$").unwrap()
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(^|\s)((https?://)?[\w-]+(\.[\w-]+)+\.?(:\d+)?(/\S*)?)").unwrap()
});

static IP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?))*$",
    )
    .unwrap()
});

static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]*$").unwrap());

static CHARACTERS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[a-z]*$").unwrap());

static ALPHANUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[a-z0-9]*$").unwrap());

// 1-31, no leading zero
static DAY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([1-9]|[1-2][0-9]|3[01])$").unwrap());

static MONTH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(0?[1-9]|1[0-2])$").unwrap());

static YEAR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(19|20)[0-9]{2}$").unwrap());

// DD MM YYYY, DD-MM-YYYY, DD/MM/YYYY, DD.MM.YYYY (century optional)
static DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((0?[1-9]|[12][0-9]|3[01])[- /.](0?[1-9]|1[012])[- /.](19|20)?[0-9]{2})*$").unwrap()
});

static US_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((0?[1-9]|1[012])[- /.](0?[1-9]|[12][0-9]|3[01])[- /.](19|20)?[0-9]{2})*$").unwrap()
});

static MYSQL_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((19|20)?[0-9]{2}-(0?[1-9]|1[012])-(0?[1-9]|[12][0-9]|3[01]))*$").unwrap()
});

/// Pattern rules in declaration order
pub fn builtin_patterns() -> Vec<Rule> {
    vec![
        Rule::pattern(ids::EMAIL, "email", "This must be a valid email address", EMAIL_REGEX.clone()),
        Rule::pattern(ids::URL, "url", "This must be a valid url", URL_REGEX.clone()),
        Rule::pattern(ids::IP, "ip", "This must be a valid IP number", IP_REGEX.clone()),
        Rule::pattern(ids::NUMBER, "number", "This must contain only numbers", NUMBER_REGEX.clone()),
        Rule::pattern(
            ids::CHARACTERS,
            "characters",
            "This must contain only characters",
            CHARACTERS_REGEX.clone(),
        ),
        Rule::pattern(
            ids::ALPHANUMERIC,
            "alphanumeric",
            "This must contain only alphanumeric characters",
            ALPHANUMERIC_REGEX.clone(),
        ),
        Rule::pattern(ids::DAY, "day", "This must be a valid day", DAY_REGEX.clone()),
        Rule::pattern(ids::MONTH, "month", "This must be a valid month", MONTH_REGEX.clone()),
        Rule::pattern(ids::YEAR, "year", "This must be a valid year", YEAR_REGEX.clone()),
        Rule::pattern(ids::DATE, "date", "This must be a valid date (DD/MM/YYYY)", DATE_REGEX.clone()),
        Rule::pattern(
            ids::US_DATE,
            "usdate",
            "This must be a valid date (MM/DD/YYYY)",
            US_DATE_REGEX.clone(),
        ),
        Rule::pattern(
            ids::MYSQL_DATE,
            "mysqldate",
            "This must be a valid date (YYYY-MM-DD)",
            MYSQL_DATE_REGEX.clone(),
        ),
    ]
}
