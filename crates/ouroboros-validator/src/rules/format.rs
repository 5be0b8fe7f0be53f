//! String format rules
//!
//! All of these read through one level of pointer (nil fails with the rule's
//! message) and only accept strings; `number` also accepts integer kinds.

use crate::context::{RuleError, RuleResult, ValidationContext};
use crate::formats;
use crate::types::Value;
use std::net::IpAddr;

/// Resolve the field as a string, or classify why it cannot be one
fn string_target<'a>(ctx: &ValidationContext<'a>, message: &str) -> Result<&'a str, RuleError> {
    match ctx.target() {
        None => Err(ctx.feedback(message)),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(ctx.unsupported(other.kind())),
    }
}

fn check(ctx: &ValidationContext<'_>, message: &str, predicate: impl Fn(&str) -> bool) -> RuleResult {
    let value = string_target(ctx, message)?;
    if predicate(value) {
        Ok(())
    } else {
        Err(ctx.feedback(message))
    }
}

pub fn email(ctx: &ValidationContext<'_>) -> RuleResult {
    check(ctx, "invalid email format", formats::is_email)
}

pub fn phone(ctx: &ValidationContext<'_>) -> RuleResult {
    check(ctx, "invalid phone number", formats::is_phone)
}

// ============================================================================
// IP addresses
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IpVersion {
    Any,
    V4,
    V6,
}

/// `ip`, `ip:v4` or `ip:v6`
pub fn ip(ctx: &ValidationContext<'_>) -> RuleResult {
    let version = match ctx.param {
        "" => IpVersion::Any,
        "v4" => IpVersion::V4,
        "v6" => IpVersion::V6,
        _ => return Err(ctx.invalid_param("expected empty, 'v4' or 'v6'")),
    };
    check_ip(ctx, version)
}

pub fn ipv4(ctx: &ValidationContext<'_>) -> RuleResult {
    check_ip(ctx, IpVersion::V4)
}

pub fn ipv6(ctx: &ValidationContext<'_>) -> RuleResult {
    check_ip(ctx, IpVersion::V6)
}

fn check_ip(ctx: &ValidationContext<'_>, version: IpVersion) -> RuleResult {
    let message = match version {
        IpVersion::Any => "invalid ip address",
        IpVersion::V4 => "invalid ipv4 address",
        IpVersion::V6 => "invalid ipv6 address",
    };
    check(ctx, message, |s| match s.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => version != IpVersion::V6,
        Ok(IpAddr::V6(_)) => version != IpVersion::V4,
        Err(_) => false,
    })
}

// ============================================================================
// Character classes
// ============================================================================

/// Digit-only strings; integer kinds always pass
pub fn number(ctx: &ValidationContext<'_>) -> RuleResult {
    const MESSAGE: &str = "field must be a valid numeric value";
    match ctx.target() {
        Some(Value::Int(_)) | Some(Value::Uint(_)) => Ok(()),
        _ => check(ctx, MESSAGE, formats::is_number),
    }
}

pub fn lower(ctx: &ValidationContext<'_>) -> RuleResult {
    check(ctx, "field must be a lowercase string", |s| s == s.to_lowercase())
}

pub fn upper(ctx: &ValidationContext<'_>) -> RuleResult {
    check(ctx, "field must be an uppercase string", |s| s == s.to_uppercase())
}

pub fn alpha(ctx: &ValidationContext<'_>) -> RuleResult {
    check(ctx, "field can only contain alphabetic characters", formats::is_alpha)
}

pub fn username(ctx: &ValidationContext<'_>) -> RuleResult {
    check(
        ctx,
        "username may contain only English letters, numbers, and @/./- characters",
        formats::is_username,
    )
}

// ============================================================================
// Affixes
// ============================================================================

pub fn prefix(ctx: &ValidationContext<'_>) -> RuleResult {
    let message = format!("field must start with '{}'", ctx.param);
    check(ctx, &message, |s| s.starts_with(ctx.param))
}

pub fn suffix(ctx: &ValidationContext<'_>) -> RuleResult {
    let message = format!("field must end with '{}'", ctx.param);
    check(ctx, &message, |s| s.ends_with(ctx.param))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigError;
    use crate::types::{Field, Record};

    fn run(
        rule: fn(&ValidationContext<'_>) -> RuleResult,
        value: impl Into<Value>,
        param: &str,
    ) -> RuleResult {
        let record = Record::new("Form").field(Field::new("F", value));
        let ctx = ValidationContext::new(&record.fields[0], &record, "fmt", param);
        rule(&ctx)
    }

    fn is_unsupported(result: RuleResult) -> bool {
        matches!(result, Err(RuleError::Config(ConfigError::UnsupportedKind { .. })))
    }

    #[test]
    fn test_email_and_phone() {
        assert!(run(email, "user@example.com", "").is_ok());
        assert!(run(email, "user@", "").is_err());
        assert!(run(phone, "+86 13212341234", "").is_ok());
        assert!(run(phone, "+86 1234", "").is_err());
        assert!(is_unsupported(run(email, 5i32, "")));
    }

    #[test]
    fn test_ip_versions() {
        assert!(run(ip, "192.168.0.1", "").is_ok());
        assert!(run(ip, "::1", "").is_ok());
        assert!(run(ip, "999.1.1.1", "").is_err());
        assert!(run(ip, "192.168.0.1", "v4").is_ok());
        assert!(run(ip, "::1", "v4").is_err());
        assert!(run(ip, "fe80::1", "v6").is_ok());
        assert!(run(ip, "10.0.0.1", "v6").is_err());
        assert!(run(ipv4, "10.0.0.1", "").is_ok());
        assert!(run(ipv6, "10.0.0.1", "").is_err());
        assert!(matches!(
            run(ip, "10.0.0.1", "v5"),
            Err(RuleError::Config(ConfigError::InvalidParam { .. }))
        ));
    }

    #[test]
    fn test_number() {
        assert!(run(number, "12345", "").is_ok());
        assert!(run(number, "12a45", "").is_err());
        assert!(run(number, -3i32, "").is_ok());
        assert!(run(number, 3u8, "").is_ok());
        assert!(is_unsupported(run(number, 1.5f64, "")));
    }

    #[test]
    fn test_case_and_alpha() {
        assert!(run(lower, "abc1", "").is_ok());
        assert!(run(lower, "aBc", "").is_err());
        assert!(run(upper, "ABC", "").is_ok());
        assert!(run(upper, "ABc", "").is_err());
        assert!(run(alpha, "abcXYZ", "").is_ok());
        assert!(run(alpha, "abc1", "").is_err());
        assert!(run(username, "jane.doe@corp", "").is_ok());
        assert!(run(username, "jane doe", "").is_err());
        assert!(is_unsupported(run(lower, vec!["a"], "")));
    }

    #[test]
    fn test_affixes() {
        assert!(run(prefix, "https://example.com", "https://").is_ok());
        match run(prefix, "http://example.com", "https://") {
            Err(RuleError::Feedback(f)) => assert_eq!(f.message, "field must start with 'https://'"),
            other => panic!("expected feedback, got {:?}", other),
        }
        assert!(run(suffix, "report.pdf", ".pdf").is_ok());
        assert!(run(suffix, "report.doc", ".pdf").is_err());
    }

    fn message(result: RuleResult) -> String {
        match result {
            Err(RuleError::Feedback(f)) => f.message,
            other => panic!("expected feedback, got {:?}", other),
        }
    }

    #[test]
    fn test_default_messages() {
        assert_eq!(message(run(email, "x", "")), "invalid email format");
        assert_eq!(message(run(phone, "x", "")), "invalid phone number");
        assert_eq!(message(run(ip, "x", "")), "invalid ip address");
        assert_eq!(message(run(ipv4, "x", "")), "invalid ipv4 address");
        assert_eq!(message(run(ipv6, "x", "")), "invalid ipv6 address");
        assert_eq!(message(run(suffix, "x", ".pdf")), "field must end with '.pdf'");
    }

    #[test]
    fn test_nil_pointer_is_feedback() {
        assert!(matches!(run(email, None::<String>, ""), Err(RuleError::Feedback(_))));
        assert!(matches!(run(number, None::<String>, ""), Err(RuleError::Feedback(_))));
        assert!(run(email, Some("a@b.io"), "").is_ok());
    }
}
