//! Ouroboros Validator
//!
//! Tag-driven field validation for the Ouroboros framework.
//!
//! Each field of a record carries a rule annotation such as
//! `len:8-20,required,password:3`. The [`Engine`] parses it, dispatches each
//! rule to a registered rule function and collects every data failure into a
//! [`ValidationError`] that keeps declaration order. Misconfiguration (an
//! unknown flag, a malformed parameter, a rule applied to the wrong kind)
//! aborts with a [`ConfigError`] instead.
//!
//! # Features
//!
//! - **Default**: engine, built-in rule library, translation hook
//! - **serde**: serialize reports as `{ field: [messages] }`, (de)serialize
//!   [`EngineConfig`]
//!
//! # Example
//!
//! ```rust
//! use ouroboros_validator::{Engine, Field, Record};
//!
//! let engine = Engine::new();
//!
//! let form = Record::new("Signup")
//!     .field(Field::new("UserName", "jane.doe").validate("required,username,len:3-20"))
//!     .field(Field::new("Password", "abc123").validate("password:2"))
//!     .field(Field::new("Password2", "abc124").validate("eq_field:Password"))
//!     .field(Field::new("Referrer", "").validate("blank,email"));
//!
//! let err = engine.validate(&form).unwrap_err();
//! let report = err.as_validation().unwrap();
//! assert_eq!(report.len(), 2);
//! assert!(report.get("Password").is_some());
//! assert!(report.get("Password2").is_some());
//! assert!(report.get("Referrer").is_none());
//! ```

// Public modules
pub mod config;
pub mod context;
pub mod engine;
pub mod errors;
pub mod formats;
pub mod grammar;
pub mod registry;
pub mod rules;
pub mod translation;
pub mod types;

// Re-export commonly used types
pub use config::EngineConfig;
pub use context::{RuleError, RuleResult, ValidationContext};
pub use engine::Engine;
pub use errors::{
    ConfigError, Error, Feedback, FieldError, Result, Translator, ValidationError,
};
pub use grammar::{parse_rules, Rule, BLANK_FLAG};
pub use registry::{
    default_registry, register_default_feedback_handler, register_default_validator,
    BoxedFeedbackHandler, BoxedValidator, FeedbackHandler, Registry, Validator,
};
pub use translation::TranslationTable;
pub use types::{Field, Introspect, Kind, Record, Value, ZERO_TIME};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
