//! Format checks for common string patterns
//!
//! Pre-compiled regexes backing the built-in format rules (`email`, `phone`,
//! `number`, `alpha`, `username`) and the character classes used by the
//! tiered `password` rule.

use once_cell::sync::Lazy;
use regex::Regex;

/// Calling code that switches `phone` to the mainland-China mobile pattern
pub const CHINA_CALLING_CODE: &str = "+86";

// ============================================================================
// Pre-compiled Regex Patterns
// ============================================================================

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-zA-Z_.+-]+@[0-9a-zA-Z_-]+(\.[0-9a-zA-Z_-]+)+$").unwrap()
});

/// Optional calling code, optional space, 9 to 11 digits
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+\d{1,3})?\s?\d{9,11}$").unwrap()
});

/// +86 13212341234
static CHINA_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+86)?\s?1[3-9]\d{9}$").unwrap()
});

static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-zA-Z@.-]+$").unwrap());

pub(crate) static LETTER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z]").unwrap());

pub(crate) static DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());

pub(crate) static LOWER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").unwrap());

pub(crate) static UPPER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());

pub(crate) static SYMBOL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[`~!@#$%^&*()\-_=+\[{\]};:'",<.>/?\\|]"#).unwrap()
});

// ============================================================================
// Format Validators
// ============================================================================

/// Validate email format
///
/// # Example
/// ```
/// use ouroboros_validator::formats::is_email;
///
/// assert!(is_email("user@example.com"));
/// assert!(!is_email("invalid-email"));
/// ```
pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Validate phone number format
///
/// Numbers starting with `+86` must be mainland-China mobile numbers;
/// anything else is checked against a generic international pattern.
///
/// # Example
/// ```
/// use ouroboros_validator::formats::is_phone;
///
/// assert!(is_phone("+86 13212341234"));
/// assert!(is_phone("+44 7911123456"));
/// assert!(!is_phone("+86 12212341234"));
/// ```
pub fn is_phone(value: &str) -> bool {
    if value.starts_with(CHINA_CALLING_CODE) {
        CHINA_PHONE_REGEX.is_match(value)
    } else {
        PHONE_REGEX.is_match(value)
    }
}

/// Validate that a string is made of ASCII digits only
pub fn is_number(value: &str) -> bool {
    NUMBER_REGEX.is_match(value)
}

/// Validate that a string is made of ASCII letters only
pub fn is_alpha(value: &str) -> bool {
    ALPHA_REGEX.is_match(value)
}

/// Validate username format (letters, digits, `@`, `.`, `-`)
pub fn is_username(value: &str) -> bool {
    USERNAME_REGEX.is_match(value)
}
