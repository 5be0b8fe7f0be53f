//! Presence and length rules: `required`, `len`

use crate::context::{RuleError, RuleResult, ValidationContext};

/// `required`: the raw field value must not be the zero value of its kind
pub fn required(ctx: &ValidationContext<'_>) -> RuleResult {
    if ctx.value.is_zero() {
        Err(ctx.feedback("field is required"))
    } else {
        Ok(())
    }
}

/// `len:N` (exact) or `len:MIN-MAX` (inclusive)
///
/// Applies to strings (counted in characters), lists, arrays and maps. A nil
/// pointer fails with the rule's standard message.
pub fn len(ctx: &ValidationContext<'_>) -> RuleResult {
    let (min, max) = parse_bounds(ctx)?;
    let message = || {
        if min == max {
            format!("field length must be exactly {}", min)
        } else {
            format!("field length must be between {} and {}", min, max)
        }
    };

    let Some(value) = ctx.target() else {
        return Err(ctx.feedback(message()));
    };
    let Some(length) = value.length() else {
        return Err(ctx.unsupported(value.kind()));
    };

    if length < min || length > max {
        return Err(ctx.feedback(message()));
    }
    Ok(())
}

fn parse_bounds(ctx: &ValidationContext<'_>) -> Result<(usize, usize), RuleError> {
    let parse = |text: &str| {
        text.trim()
            .parse::<usize>()
            .map_err(|e| ctx.invalid_param(format!("expected N or MIN-MAX ({})", e)))
    };

    match ctx.param.split_once('-') {
        Some((_, max)) if max.contains('-') => {
            Err(ctx.invalid_param("expected N or MIN-MAX"))
        }
        Some((min, max)) => {
            let (min, max) = (parse(min)?, parse(max)?);
            if min > max {
                return Err(ctx.invalid_param("minimum exceeds maximum"));
            }
            Ok((min, max))
        }
        None => {
            let exact = parse(ctx.param)?;
            Ok((exact, exact))
        }
    }
}
