//! Rule annotation grammar
//!
//! A rule tag is a comma-separated list of `flag[:param]` tokens, e.g.
//! `len:8-20,required,password:3`. Only the first colon splits a token, so a
//! parameter may itself contain colons (`gt:2024-01-01 08:00:00`). There is no
//! escape for a literal comma.

use std::fmt;

/// Reserved flag: skip every other rule of the field when its value is zero.
pub const BLANK_FLAG: &str = "blank";

// ============================================================================
// Rule
// ============================================================================

/// One `(flag, param)` pair parsed from a rule tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Rule name, case-sensitive (e.g. "len")
    pub flag: String,
    /// Free-form parameter text, empty when the token has no colon
    pub param: String,
}

impl Rule {
    /// Create a new rule
    pub fn new(flag: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            param: param.into(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.param.is_empty() {
            write!(f, "{}", self.flag)
        } else {
            write!(f, "{}:{}", self.flag, self.param)
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a rule tag into its ordered rule sequence
///
/// Parsing never fails: tokens with an empty flag are dropped, and malformed
/// parameters are left for the rule that interprets them. Duplicate flags are
/// kept in order.
///
/// # Example
/// ```
/// use ouroboros_validator::grammar::{parse_rules, Rule};
///
/// let rules = parse_rules("len:8-20, required");
/// assert_eq!(rules, vec![Rule::new("len", "8-20"), Rule::new("required", "")]);
/// ```
pub fn parse_rules(tag: &str) -> Vec<Rule> {
    tag.split(',')
        .filter_map(|token| {
            let (flag, param) = match token.split_once(':') {
                Some((flag, param)) => (flag.trim(), param.trim()),
                None => (token.trim(), ""),
            };
            if flag.is_empty() {
                None
            } else {
                Some(Rule::new(flag, param))
            }
        })
        .collect()
}

/// Remove the reserved `blank` flag, returning whether it was present
pub fn take_blank(rules: &mut Vec<Rule>) -> bool {
    let before = rules.len();
    rules.retain(|rule| rule.flag != BLANK_FLAG);
    rules.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        assert_eq!(
            parse_rules("len:8-20,required"),
            vec![Rule::new("len", "8-20"), Rule::new("required", "")]
        );
    }

    #[test]
    fn test_parse_splits_on_first_colon_only() {
        assert_eq!(parse_rules("eq: a:b "), vec![Rule::new("eq", "a:b")]);
        assert_eq!(
            parse_rules("gt:2024-01-01 08:30:00"),
            vec![Rule::new("gt", "2024-01-01 08:30:00")]
        );
    }

    #[test]
    fn test_parse_drops_empty_tokens() {
        assert_eq!(parse_rules(",,required"), vec![Rule::new("required", "")]);
        assert_eq!(parse_rules(" :5, ,"), Vec::<Rule>::new());
        assert!(parse_rules("").is_empty());
    }

    #[test]
    fn test_parse_keeps_duplicates_in_order() {
        let rules = parse_rules("len:3,required,len:1-9");
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0], Rule::new("len", "3"));
        assert_eq!(rules[2], Rule::new("len", "1-9"));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let rules = parse_rules("Required");
        assert_eq!(rules[0].flag, "Required");
    }

    #[test]
    fn test_take_blank() {
        let mut rules = parse_rules("len:5-10,blank");
        assert!(take_blank(&mut rules));
        assert_eq!(rules, vec![Rule::new("len", "5-10")]);

        let mut rules = parse_rules("required");
        assert!(!take_blank(&mut rules));
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(Rule::new("len", "3").to_string(), "len:3");
        assert_eq!(Rule::new("email", "").to_string(), "email");
    }
}
