//! Built-in rule library
//!
//! Every rule is a plain function over a [`ValidationContext`] and is
//! registered under its flag by [`register_builtin`].
//!
//! [`ValidationContext`]: crate::context::ValidationContext

pub mod compare;
pub mod format;
pub mod password;
pub mod presence;

use crate::registry::Registry;

/// Flags installed by [`register_builtin`], in registration order
pub const BUILTIN_FLAGS: &[&str] = &[
    "required", "len", "eq", "gt", "gte", "lt", "lte", "email", "phone", "ip", "ipv4", "ipv6",
    "number", "lower", "upper", "alpha", "username", "password", "eq_field", "lt_field",
    "lte_field", "gt_field", "gte_field", "prefix", "suffix",
];

/// Install every built-in rule into `registry`
pub fn register_builtin(registry: &mut Registry) {
    registry.register_validator("required", presence::required);
    registry.register_validator("len", presence::len);

    registry.register_validator("eq", compare::eq);
    registry.register_validator("gt", compare::gt);
    registry.register_validator("gte", compare::gte);
    registry.register_validator("lt", compare::lt);
    registry.register_validator("lte", compare::lte);

    registry.register_validator("email", format::email);
    registry.register_validator("phone", format::phone);
    registry.register_validator("ip", format::ip);
    registry.register_validator("ipv4", format::ipv4);
    registry.register_validator("ipv6", format::ipv6);
    registry.register_validator("number", format::number);
    registry.register_validator("lower", format::lower);
    registry.register_validator("upper", format::upper);
    registry.register_validator("alpha", format::alpha);
    registry.register_validator("username", format::username);
    registry.register_validator("password", password::password);

    registry.register_validator("eq_field", compare::eq_field);
    registry.register_validator("lt_field", compare::lt_field);
    registry.register_validator("lte_field", compare::lte_field);
    registry.register_validator("gt_field", compare::gt_field);
    registry.register_validator("gte_field", compare::gte_field);

    registry.register_validator("prefix", format::prefix);
    registry.register_validator("suffix", format::suffix);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_flag_registered() {
        let mut registry = Registry::new();
        register_builtin(&mut registry);
        for flag in BUILTIN_FLAGS {
            assert!(registry.contains(flag), "missing built-in '{}'", flag);
        }
        assert_eq!(registry.flags().len(), BUILTIN_FLAGS.len());
    }
}
