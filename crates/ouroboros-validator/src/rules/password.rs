//! Tiered password strength
//!
//! `password:N` checks tiers `1..=N` in order and stops at the first pattern
//! the value is missing. An empty parameter means the strongest tier.

use crate::context::{RuleResult, ValidationContext};
use crate::formats::{DIGIT_REGEX, LETTER_REGEX, LOWER_REGEX, SYMBOL_REGEX, UPPER_REGEX};
use crate::types::Value;
use once_cell::sync::Lazy;
use regex::Regex;

/// Strength used when the rule has no parameter
pub const DEFAULT_STRENGTH: u8 = 3;

/// One strength tier: every pattern must match somewhere in the value
pub struct Tier {
    pub strength: u8,
    pub patterns: &'static [&'static Lazy<Regex>],
    pub message: &'static str,
}

/// Tiers in ascending strength
pub static TIERS: [Tier; 3] = [
    Tier {
        strength: 1,
        patterns: &[&LETTER_REGEX, &DIGIT_REGEX],
        message: "password must contain letters and numbers",
    },
    Tier {
        strength: 2,
        patterns: &[&LOWER_REGEX, &UPPER_REGEX],
        message: "password must contain uppercase and lowercase letters and numbers",
    },
    Tier {
        strength: 3,
        patterns: &[&SYMBOL_REGEX],
        message: "password must contain uppercase and lowercase letters, numbers and symbols",
    },
];

pub fn password(ctx: &ValidationContext<'_>) -> RuleResult {
    let strength = match ctx.param {
        "" => DEFAULT_STRENGTH,
        param => match param.parse::<u8>() {
            Ok(n) if (1..=DEFAULT_STRENGTH).contains(&n) => n,
            _ => return Err(ctx.invalid_param("expected strength 1, 2 or 3")),
        },
    };

    let value = match ctx.target() {
        None => return Err(ctx.feedback(TIERS[0].message)),
        Some(Value::String(s)) => s.as_str(),
        Some(other) => return Err(ctx.unsupported(other.kind())),
    };

    for tier in TIERS.iter().take_while(|t| t.strength <= strength) {
        if !tier.patterns.iter().all(|re| re.is_match(value)) {
            return Err(ctx.feedback(tier.message));
        }
    }
    Ok(())
}
