//! Per-rule validation context
//!
//! A [`ValidationContext`] is built for every `(field, rule)` pair the engine
//! dispatches. It gives the rule function the field, its value, the enclosing
//! record (for cross-field rules) and the rule's flag and parameter, plus
//! helpers to classify a failure as data feedback or configuration error.

use crate::errors::{ConfigError, Feedback};
use crate::types::{Field, Kind, Record, Value};

/// Outcome of one rule function
pub type RuleResult = Result<(), RuleError>;

/// Failure signalled by a rule function
#[derive(Debug, Clone, PartialEq)]
pub enum RuleError {
    /// The value violates the rule; accumulated into the report
    Feedback(Feedback),
    /// The rule is misconfigured; aborts the whole validation call
    Config(ConfigError),
}

impl From<ConfigError> for RuleError {
    fn from(err: ConfigError) -> Self {
        RuleError::Config(err)
    }
}

impl From<Feedback> for RuleError {
    fn from(feedback: Feedback) -> Self {
        RuleError::Feedback(feedback)
    }
}

/// Everything a rule function may look at
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Field under validation
    pub field: &'a Field,
    /// Current value of the field (not dereferenced)
    pub value: &'a Value,
    /// Enclosing record
    pub record: &'a Record,
    /// Rule flag
    pub flag: &'a str,
    /// Rule parameter
    pub param: &'a str,
}

impl<'a> ValidationContext<'a> {
    /// Create a context for one rule on one field
    pub fn new(field: &'a Field, record: &'a Record, flag: &'a str, param: &'a str) -> Self {
        Self {
            field,
            value: &field.value,
            record,
            flag,
            param,
        }
    }

    /// Field value with one level of pointer indirection followed
    ///
    /// `None` means a nil pointer; rules treat that as a data failure.
    pub fn target(&self) -> Option<&'a Value> {
        self.value.indirect()
    }

    /// Resolve a sibling field of the enclosing record by name
    pub fn sibling(&self, name: &str) -> Result<&'a Field, RuleError> {
        self.record.get(name).ok_or_else(|| {
            RuleError::Config(ConfigError::UnknownField {
                field: self.field.name.clone(),
                flag: self.flag.to_string(),
                target: name.to_string(),
            })
        })
    }

    /// Data failure carrying `message`
    pub fn feedback(&self, message: impl Into<String>) -> RuleError {
        RuleError::Feedback(Feedback::new(
            self.field.name.clone(),
            self.flag,
            self.param,
            message,
        ))
    }

    /// Configuration error: the parameter cannot be interpreted
    pub fn invalid_param(&self, reason: impl Into<String>) -> RuleError {
        RuleError::Config(ConfigError::InvalidParam {
            field: self.field.name.clone(),
            flag: self.flag.to_string(),
            param: self.param.to_string(),
            reason: reason.into(),
        })
    }

    /// Configuration error: the rule does not apply to `kind`
    pub fn unsupported(&self, kind: Kind) -> RuleError {
        RuleError::Config(ConfigError::UnsupportedKind {
            field: self.field.name.clone(),
            flag: self.flag.to_string(),
            kind,
        })
    }

    /// Configuration error with a free-form message, for user rules
    pub fn config_error(&self, message: impl Into<String>) -> RuleError {
        RuleError::Config(ConfigError::Custom {
            field: self.field.name.clone(),
            flag: self.flag.to_string(),
            message: message.into(),
        })
    }
}
