//! Validation engine
//!
//! An [`Engine`] walks the fields of a record in declaration order, parses
//! each field's rule annotation and dispatches every rule to the registered
//! rule function. Data failures accumulate into a [`ValidationError`];
//! the first configuration error aborts the call.
//!
//! # Example
//!
//! ```
//! use ouroboros_validator::{Engine, Field, Record};
//!
//! let engine = Engine::new();
//! let form = Record::new("Login")
//!     .field(Field::new("Email", "jane@example.com").validate("required,email"))
//!     .field(Field::new("Password", "abc").validate("len:8-20"));
//!
//! let err = engine.validate(&form).unwrap_err();
//! let report = err.as_validation().unwrap();
//! assert_eq!(report.len(), 1);
//! assert_eq!(report.fields()[0].field, "Password");
//! ```

use crate::config::EngineConfig;
use crate::context::{RuleError, ValidationContext};
use crate::errors::{ConfigError, Error, FieldError, Result, ValidationError};
use crate::grammar::{parse_rules, take_blank, Rule};
use crate::registry::{default_registry, FeedbackHandler, Registry, Validator};
use crate::types::{Field, Introspect, Record, Value};
use parking_lot::RwLock;

// ============================================================================
// Engine
// ============================================================================

/// Tag-driven validator with its own rule registry
///
/// Registration takes `&self`, so an engine can be shared behind an `Arc`
/// and extended while other threads validate.
pub struct Engine {
    config: EngineConfig,
    registry: RwLock<Registry>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine seeded from the default registry
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with custom tag names
    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_registry(config, default_registry())
    }

    /// Create an engine over an explicit registry
    pub fn with_registry(config: EngineConfig, registry: Registry) -> Self {
        tracing::debug!(
            tag = %config.tag_name,
            feedback_tag = %config.feedback_tag_name,
            "Creating validation engine"
        );
        Self {
            config,
            registry: RwLock::new(registry),
        }
    }

    /// Current configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Change which annotation holds the rule list
    pub fn set_tag_name(&mut self, name: impl Into<String>) {
        self.config.tag_name = name.into();
    }

    /// Change which annotation holds the static feedback override
    pub fn set_feedback_tag_name(&mut self, name: impl Into<String>) {
        self.config.feedback_tag_name = name.into();
    }

    /// Register or replace a rule function on this engine only
    pub fn register_validator(&self, flag: impl Into<String>, validator: impl Validator + 'static) {
        let flag = flag.into();
        tracing::debug!("Registering validator '{}'", flag);
        self.registry.write().register_validator(flag, validator);
    }

    /// Register or replace a feedback handler on this engine only
    pub fn register_feedback_handler(
        &self,
        flag: impl Into<String>,
        handler: impl FeedbackHandler + 'static,
    ) {
        let flag = flag.into();
        tracing::debug!("Registering feedback handler '{}'", flag);
        self.registry.write().register_feedback_handler(flag, handler);
    }

    /// Snapshot of this engine's registry
    pub fn registry(&self) -> Registry {
        self.registry.read().clone()
    }

    /// Validate a record
    ///
    /// Returns `Err(Error::Validation)` with every failing field when the
    /// configuration is sound, or `Err(Error::Config)` on the first
    /// configuration problem (no partial report in that case).
    pub fn validate<T: Introspect + ?Sized>(&self, target: &T) -> Result<()> {
        let value = target.introspect();
        let record = record_of(&value)?;
        tracing::debug!("Validating record '{}'", record.name);

        let mut report = ValidationError::new();
        for field in &record.fields {
            if let Some(error) = self.validate_field(field, record)? {
                report.add(error);
            }
        }

        if !report.is_empty() {
            tracing::debug!(
                "Record '{}' failed validation on {} field(s)",
                record.name,
                report.len()
            );
        }
        report.into_result().map_err(Error::from)
    }

    fn validate_field(
        &self,
        field: &Field,
        record: &Record,
    ) -> std::result::Result<Option<FieldError>, ConfigError> {
        if !field.exported {
            return Ok(None);
        }
        let Some(tag) = field.lookup(&self.config.tag_name) else {
            return Ok(None);
        };

        let mut rules = parse_rules(tag);
        if take_blank(&mut rules) && field.value.is_zero() {
            tracing::trace!(field = %field.name, "Skipping blank field");
            return Ok(None);
        }

        let mut error = FieldError::new(&field.name);
        for rule in &rules {
            self.apply_rule(rule, field, record, &mut error)?;
        }

        if error.is_empty() {
            return Ok(None);
        }
        if let Some(message) = field.lookup(&self.config.feedback_tag_name) {
            error.collapse(message);
        }
        Ok(Some(error))
    }

    fn apply_rule(
        &self,
        rule: &Rule,
        field: &Field,
        record: &Record,
        error: &mut FieldError,
    ) -> std::result::Result<(), ConfigError> {
        // Release the lock before running user code, which may register rules
        let (validator, handler) = {
            let registry = self.registry.read();
            (
                registry.validator(&rule.flag),
                registry.feedback_handler(&rule.flag),
            )
        };

        let Some(validator) = validator else {
            tracing::warn!(field = %field.name, flag = %rule.flag, "Unregistered validator");
            return Err(ConfigError::UnknownFlag {
                field: field.name.clone(),
                flag: rule.flag.clone(),
            });
        };

        tracing::trace!(field = %field.name, rule = %rule, "Evaluating rule");
        let ctx = ValidationContext::new(field, record, &rule.flag, &rule.param);
        match validator.validate(&ctx) {
            Ok(()) => Ok(()),
            Err(RuleError::Feedback(mut feedback)) => {
                if let Some(handler) = handler {
                    feedback.message = handler.handle(&feedback);
                }
                error.push(feedback);
                Ok(())
            }
            Err(RuleError::Config(err)) => {
                tracing::warn!(field = %field.name, flag = %rule.flag, "Validation aborted: {}", err);
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("registry", &*self.registry.read())
            .finish()
    }
}

/// Resolve the record under validation, following one pointer level
fn record_of(value: &Value) -> std::result::Result<&Record, ConfigError> {
    match value {
        Value::Record(record) => Ok(record),
        Value::Pointer(None) => Err(ConfigError::NilPointer),
        Value::Pointer(Some(inner)) => match inner.as_ref() {
            Value::Record(record) => Ok(record),
            other => Err(ConfigError::UnsupportedValue { kind: other.kind() }),
        },
        other => Err(ConfigError::UnsupportedValue { kind: other.kind() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RuleResult;
    use crate::errors::Feedback;
    use crate::types::Kind;

    fn form() -> Record {
        Record::new("Signup")
            .field(Field::new("UserName", "jo").validate("required,len:3-20"))
            .field(Field::new("Age", 12i32).validate("gte:18"))
            .field(Field::new("Nickname", "anything"))
    }

    #[test]
    fn test_report_in_declaration_order() {
        let err = Engine::new().validate(&form()).unwrap_err();
        let report = err.as_validation().unwrap();
        let names: Vec<&str> = report.fields().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(names, vec!["UserName", "Age"]);
        assert_eq!(
            report.messages("Age").unwrap(),
            vec!["field value must be greater than or equal to 18".to_string()]
        );
    }

    #[test]
    fn test_all_rules_run_after_failure() {
        let record = Record::new("Form")
            .field(Field::new("Code", "ab").validate("len:3,upper,prefix:X"));
        let err = Engine::new().validate(&record).unwrap_err();
        let field = &err.as_validation().unwrap().fields()[0];
        let flags: Vec<&str> = field.feedbacks.iter().map(|f| f.flag.as_str()).collect();
        assert_eq!(flags, vec!["len", "upper", "prefix"]);
    }

    #[test]
    fn test_unknown_flag_aborts() {
        let record = Record::new("Form")
            .field(Field::new("A", "").validate("required"))
            .field(Field::new("B", "x").validate("frobnicate"));
        let err = Engine::new().validate(&record).unwrap_err();
        assert_eq!(
            err.as_config(),
            Some(&ConfigError::UnknownFlag {
                field: "B".to_string(),
                flag: "frobnicate".to_string(),
            })
        );
    }

    #[test]
    fn test_non_record_inputs() {
        let engine = Engine::new();
        assert_eq!(
            engine.validate(&Value::from(5i32)).unwrap_err().as_config(),
            Some(&ConfigError::UnsupportedValue { kind: Kind::Int })
        );
        assert_eq!(
            engine.validate(&None::<Record>).unwrap_err().as_config(),
            Some(&ConfigError::NilPointer)
        );
        assert!(engine.validate(&Some(Record::new("Empty"))).is_ok());
    }

    #[test]
    fn test_feedback_handler_rewrites_message() {
        let engine = Engine::new();
        engine.register_feedback_handler("gte", |f: &Feedback| {
            format!("{} must be at least {}", f.field, f.param)
        });
        let err = engine.validate(&form()).unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().messages("Age").unwrap(),
            vec!["Age must be at least 18".to_string()]
        );
    }

    #[test]
    fn test_engine_registration_is_local() {
        fn reject(ctx: &ValidationContext<'_>) -> RuleResult {
            Err(ctx.feedback("rejected"))
        }

        let custom = Engine::new();
        custom.register_validator("reject_all", reject);
        let record = Record::new("Form").field(Field::new("A", "x").validate("reject_all"));

        assert!(custom.validate(&record).unwrap_err().as_validation().is_some());
        assert!(Engine::new().validate(&record).unwrap_err().is_config());
    }

    #[test]
    fn test_tag_names() {
        let record = Record::new("Form").field(
            Field::new("A", "")
                .tag("check", "required")
                .tag("hint", "A is mandatory"),
        );

        let mut engine = Engine::new();
        assert!(engine.validate(&record).is_ok());

        engine.set_tag_name("check");
        engine.set_feedback_tag_name("hint");
        let err = engine.validate(&record).unwrap_err();
        assert_eq!(err.to_string(), "Field 'A' validation failure: A is mandatory");
    }
}
