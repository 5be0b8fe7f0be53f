//! Equality and ordering rules
//!
//! `eq`, `gt`, `gte`, `lt`, `lte` compare a field against its literal
//! parameter; `eq_field`, `gt_field`, `gte_field`, `lt_field`, `lte_field`
//! compare it against a sibling field of the same record. Both dispatch on
//! the value kind:
//!
//! | kind              | parameter parsed as                              |
//! |-------------------|--------------------------------------------------|
//! | string            | literal text, lexicographic order                |
//! | int / uint        | `i64` / `u64`, with `0x` `0o` `0b` `0` prefixes and `_` separators |
//! | float32 / float64 | `f32` / `f64`                                    |
//! | time              | `YYYY-MM-DD HH:MM:SS` if it has a colon, else `YYYY-MM-DD` |

use crate::context::{RuleError, RuleResult, ValidationContext};
use crate::types::Value;
use chrono::{NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Comparison operator shared by the parameter and cross-field rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    /// Whether `ordering` (field compared to reference) satisfies the operator
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Gt => ordering == Ordering::Greater,
            Self::Gte => ordering != Ordering::Less,
            Self::Lt => ordering == Ordering::Less,
            Self::Lte => ordering != Ordering::Greater,
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            Self::Eq => "equal to",
            Self::Gt => "greater than",
            Self::Gte => "greater than or equal to",
            Self::Lt => "less than",
            Self::Lte => "less than or equal to",
        }
    }
}

// ============================================================================
// Parameter comparisons
// ============================================================================

pub fn eq(ctx: &ValidationContext<'_>) -> RuleResult {
    compare_param(ctx, Comparison::Eq)
}

pub fn gt(ctx: &ValidationContext<'_>) -> RuleResult {
    compare_param(ctx, Comparison::Gt)
}

pub fn gte(ctx: &ValidationContext<'_>) -> RuleResult {
    compare_param(ctx, Comparison::Gte)
}

pub fn lt(ctx: &ValidationContext<'_>) -> RuleResult {
    compare_param(ctx, Comparison::Lt)
}

pub fn lte(ctx: &ValidationContext<'_>) -> RuleResult {
    compare_param(ctx, Comparison::Lte)
}

fn compare_param(ctx: &ValidationContext<'_>, op: Comparison) -> RuleResult {
    let message = || format!("field value must be {} {}", op.phrase(), ctx.param);

    let Some(value) = ctx.target() else {
        return Err(ctx.feedback(message()));
    };

    let ordering = match value {
        Value::String(s) => Some(s.as_str().cmp(ctx.param)),
        Value::Int(n) => Some(n.cmp(&parse_int_param(ctx)?)),
        Value::Uint(n) => Some(n.cmp(&parse_uint_param(ctx)?)),
        Value::Float32(f) => f.partial_cmp(&parse_param::<f32>(ctx)?),
        Value::Float64(f) => f.partial_cmp(&parse_param::<f64>(ctx)?),
        Value::Time(t) => Some(t.cmp(&parse_time_param(ctx)?)),
        other => return Err(ctx.unsupported(other.kind())),
    };

    // NaN never satisfies an ordering
    if ordering.is_some_and(|o| op.holds(o)) {
        Ok(())
    } else {
        Err(ctx.feedback(message()))
    }
}

fn parse_param<T>(ctx: &ValidationContext<'_>) -> Result<T, RuleError>
where
    T: FromStr,
    T::Err: Display,
{
    ctx.param
        .parse::<T>()
        .map_err(|e| ctx.invalid_param(e.to_string()))
}

fn parse_int_param(ctx: &ValidationContext<'_>) -> Result<i64, RuleError> {
    let (negative, magnitude) = parse_integer_literal(ctx.param).map_err(|e| ctx.invalid_param(e))?;
    let value = if negative {
        -i128::from(magnitude)
    } else {
        i128::from(magnitude)
    };
    i64::try_from(value).map_err(|_| ctx.invalid_param("value out of range for a signed integer"))
}

fn parse_uint_param(ctx: &ValidationContext<'_>) -> Result<u64, RuleError> {
    if ctx.param.starts_with(['+', '-']) {
        return Err(ctx.invalid_param("unsigned parameter cannot carry a sign"));
    }
    parse_integer_literal(ctx.param)
        .map(|(_, magnitude)| magnitude)
        .map_err(|e| ctx.invalid_param(e))
}

/// Parse an integer literal into `(negative, magnitude)`
///
/// Accepts an optional sign, a `0x`, `0o`, `0b` or bare `0` (octal) base
/// prefix, and `_` between digits or right after a prefix.
pub(crate) fn parse_integer_literal(text: &str) -> Result<(bool, u64), String> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let (radix, digits, prefixed) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (16, &unsigned[2..], true),
        Some("0o") | Some("0O") => (8, &unsigned[2..], true),
        Some("0b") | Some("0B") => (2, &unsigned[2..], true),
        _ if unsigned.len() > 1 && unsigned.starts_with('0') => (8, &unsigned[1..], true),
        _ => (10, unsigned, false),
    };

    let well_formed = !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !digits.ends_with('_')
        && !digits.contains("__")
        && (prefixed || !digits.starts_with('_'));
    if !well_formed {
        return Err(format!("malformed integer literal '{}'", text));
    }

    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    u64::from_str_radix(&cleaned, radix)
        .map(|magnitude| (negative, magnitude))
        .map_err(|e| e.to_string())
}

/// Parse a time parameter; a colon selects the date-plus-time format
pub(crate) fn parse_time_param(ctx: &ValidationContext<'_>) -> Result<NaiveDateTime, RuleError> {
    let param = ctx.param;
    if param.contains(':') {
        NaiveDateTime::parse_from_str(param, DATETIME_FORMAT)
            .map_err(|e| ctx.invalid_param(format!("expected YYYY-MM-DD HH:MM:SS ({})", e)))
    } else if param.contains('-') {
        NaiveDate::parse_from_str(param, DATE_FORMAT)
            .map_err(|e| ctx.invalid_param(format!("expected YYYY-MM-DD ({})", e)))
            .map(|date| date.and_hms_opt(0, 0, 0).unwrap_or_default())
    } else {
        Err(ctx.invalid_param("expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS"))
    }
}

// ============================================================================
// Cross-field comparisons
// ============================================================================

pub fn eq_field(ctx: &ValidationContext<'_>) -> RuleResult {
    compare_field(ctx, Comparison::Eq)
}

pub fn gt_field(ctx: &ValidationContext<'_>) -> RuleResult {
    compare_field(ctx, Comparison::Gt)
}

pub fn gte_field(ctx: &ValidationContext<'_>) -> RuleResult {
    compare_field(ctx, Comparison::Gte)
}

pub fn lt_field(ctx: &ValidationContext<'_>) -> RuleResult {
    compare_field(ctx, Comparison::Lt)
}

pub fn lte_field(ctx: &ValidationContext<'_>) -> RuleResult {
    compare_field(ctx, Comparison::Lte)
}

fn compare_field(ctx: &ValidationContext<'_>, op: Comparison) -> RuleResult {
    let other = ctx.sibling(ctx.param)?;
    let message = || format!("field must be {} the '{}' field", op.phrase(), ctx.param);

    let (Some(left), Some(right)) = (ctx.target(), other.value.indirect()) else {
        return Err(ctx.feedback(message()));
    };

    let ordering = match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Uint(a), Value::Uint(b)) => Some(a.cmp(b)),
        (Value::Float32(a), Value::Float32(b)) => a.partial_cmp(b),
        (Value::Float64(a), Value::Float64(b)) => a.partial_cmp(b),
        (Value::Float32(a), Value::Float64(b)) => f64::from(*a).partial_cmp(b),
        (Value::Float64(a), Value::Float32(b)) => a.partial_cmp(&f64::from(*b)),
        (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
        (a, b) if a.kind() == b.kind() => return Err(ctx.unsupported(a.kind())),
        (a, b) => {
            return Err(ctx.config_error(format!(
                "cannot compare '{}' with field '{}' of type '{}'",
                a.kind(),
                other.name,
                b.kind()
            )))
        }
    };

    if ordering.is_some_and(|o| op.holds(o)) {
        Ok(())
    } else {
        Err(ctx.feedback(message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigError;
    use crate::types::{Field, Record};

    fn run_param(
        rule: fn(&ValidationContext<'_>) -> RuleResult,
        value: impl Into<Value>,
        param: &str,
    ) -> RuleResult {
        let record = Record::new("Form").field(Field::new("F", value));
        let ctx = ValidationContext::new(&record.fields[0], &record, "cmp", param);
        rule(&ctx)
    }

    fn run_field(
        rule: fn(&ValidationContext<'_>) -> RuleResult,
        left: impl Into<Value>,
        right: impl Into<Value>,
    ) -> RuleResult {
        let record = Record::new("Form")
            .field(Field::new("Left", left))
            .field(Field::new("Right", right));
        let ctx = ValidationContext::new(&record.fields[0], &record, "cmp_field", "Right");
        rule(&ctx)
    }

    fn datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).unwrap()
    }

    #[test]
    fn test_comparison_holds() {
        assert!(Comparison::Gte.holds(Ordering::Equal));
        assert!(Comparison::Gte.holds(Ordering::Greater));
        assert!(!Comparison::Gt.holds(Ordering::Equal));
        assert!(Comparison::Lte.holds(Ordering::Less));
        assert!(!Comparison::Eq.holds(Ordering::Less));
    }

    #[test]
    fn test_eq_per_kind() {
        assert!(run_param(eq, "abc", "abc").is_ok());
        assert!(run_param(eq, "aaa", "abc").is_err());
        assert!(run_param(eq, 2i32, "2").is_ok());
        assert!(run_param(eq, 1i32, "2").is_err());
        assert!(run_param(eq, 7u16, "7").is_ok());
        assert!(run_param(eq, 3.2f64, "3.2").is_ok());
        assert!(run_param(eq, 4.13f64, "3.2").is_err());
        assert!(run_param(eq, 3.2f32, "3.2").is_ok());
    }

    #[test]
    fn test_ordering_per_kind() {
        assert!(run_param(gt, 51i64, "50").is_ok());
        assert!(run_param(gt, 50i64, "50").is_err());
        assert!(run_param(gte, 50i64, "50").is_ok());
        assert!(run_param(lt, -1i64, "0").is_ok());
        assert!(run_param(lte, 101u32, "100").is_err());
        assert!(run_param(gt, "b", "a").is_ok());
        assert!(run_param(lt, 0.5f64, "0.75").is_ok());
        assert!(run_param(gt, f64::NAN, "0").is_err());
    }

    #[test]
    fn test_integer_literal_prefixes() {
        assert!(run_param(gt, 20i32, "0x10").is_ok());
        assert!(run_param(gt, 16i32, "0x10").is_err());
        assert!(run_param(eq, 5i64, "0b101").is_ok());
        assert!(run_param(eq, 8u8, "0o10").is_ok());
        assert!(run_param(eq, 8u8, "010").is_ok());
        assert!(run_param(lte, 1000u32, "1_000").is_ok());
        assert!(run_param(lte, 1001i32, "1_000").is_err());
        assert!(run_param(gt, -15i32, "-0x10").is_ok());
        assert!(run_param(eq, i64::MIN, "-9223372036854775808").is_ok());
        assert!(run_param(eq, 0u8, "0").is_ok());
    }

    #[test]
    fn test_malformed_integer_literals() {
        for param in ["0x", "1__0", "_1", "1_", "0b102", "+-1", " 1", "99999999999999999999"] {
            assert!(
                matches!(
                    run_param(eq, 1i32, param),
                    Err(RuleError::Config(ConfigError::InvalidParam { .. }))
                ),
                "{}",
                param
            );
        }
        assert!(matches!(
            run_param(eq, 1u32, "+1"),
            Err(RuleError::Config(ConfigError::InvalidParam { .. }))
        ));
        assert_eq!(parse_integer_literal("0x_ff"), Ok((false, 255)));
        assert_eq!(parse_integer_literal("-0b1_1"), Ok((true, 3)));
    }

    #[test]
    fn test_time_param_formats() {
        let t = datetime("2020-11-04 00:00:00");
        assert!(run_param(eq, t, "2020-11-04").is_ok());
        assert!(run_param(gt, t, "2020-11-03 23:59:59").is_ok());
        assert!(run_param(lt, t, "2020-11-04 00:00:01").is_ok());
        assert!(run_param(gte, Some(t), "2020-11-04").is_ok());
        assert!(matches!(
            run_param(gt, t, "yesterday"),
            Err(RuleError::Config(ConfigError::InvalidParam { .. }))
        ));
        assert!(matches!(
            run_param(gt, t, "2020-13-45"),
            Err(RuleError::Config(ConfigError::InvalidParam { .. }))
        ));
    }

    #[test]
    fn test_pointer_handling() {
        assert!(run_param(eq, Some("aaa"), "aaa").is_ok());
        match run_param(eq, None::<String>, "aaa") {
            Err(RuleError::Feedback(f)) => assert_eq!(f.message, "field value must be equal to aaa"),
            other => panic!("expected feedback, got {:?}", other),
        }
    }

    #[test]
    fn test_param_config_errors() {
        assert!(matches!(
            run_param(eq, 1i32, "one"),
            Err(RuleError::Config(ConfigError::InvalidParam { .. }))
        ));
        assert!(matches!(
            run_param(gt, 1u32, "-1"),
            Err(RuleError::Config(ConfigError::InvalidParam { .. }))
        ));
        assert!(matches!(
            run_param(gt, true, "1"),
            Err(RuleError::Config(ConfigError::UnsupportedKind { .. }))
        ));
        assert!(matches!(
            run_param(lt, vec![1], "1"),
            Err(RuleError::Config(ConfigError::UnsupportedKind { .. }))
        ));
    }

    #[test]
    fn test_cross_field() {
        assert!(run_field(eq_field, "abc123AB", "abc123AB").is_ok());
        match run_field(eq_field, "abc123AB", "other") {
            Err(RuleError::Feedback(f)) => assert!(f.message.contains("Right")),
            other => panic!("expected feedback, got {:?}", other),
        }
        assert!(run_field(gt_field, 10i32, 5i32).is_ok());
        assert!(run_field(gte_field, 5u8, 5u8).is_ok());
        assert!(run_field(lt_field, 1.5f32, 2.0f64).is_ok());
        assert!(run_field(lte_field, Some(3i64), 3i64).is_ok());
        assert!(run_field(lt_field, datetime("2024-01-01 00:00:00"), datetime("2024-06-01 00:00:00")).is_ok());
    }

    #[test]
    fn test_cross_field_nil_is_feedback() {
        assert!(matches!(
            run_field(eq_field, None::<String>, "x"),
            Err(RuleError::Feedback(_))
        ));
        assert!(matches!(
            run_field(eq_field, "x", None::<String>),
            Err(RuleError::Feedback(_))
        ));
    }

    #[test]
    fn test_cross_field_config_errors() {
        let record = Record::new("Form").field(Field::new("Left", "x"));
        let ctx = ValidationContext::new(&record.fields[0], &record, "eq_field", "Missing");
        assert!(matches!(
            eq_field(&ctx),
            Err(RuleError::Config(ConfigError::UnknownField { .. }))
        ));

        assert!(matches!(
            run_field(eq_field, "1", 1i32),
            Err(RuleError::Config(ConfigError::Custom { .. }))
        ));
        assert!(matches!(
            run_field(eq_field, vec![1], vec![1]),
            Err(RuleError::Config(ConfigError::UnsupportedKind { .. }))
        ));
    }
}
