//! Rule and feedback-handler registries
//!
//! A [`Registry`] maps a flag name to a rule function and, optionally, to a
//! feedback handler that rewrites the rule's default message. A process-wide
//! default registry seeds every new [`Engine`](crate::engine::Engine); engines
//! take a copy, so per-engine registration never leaks into the defaults.
//!
//! # Example
//!
//! ```
//! use ouroboros_validator::registry::Registry;
//! use ouroboros_validator::context::{RuleResult, ValidationContext};
//!
//! fn even(ctx: &ValidationContext<'_>) -> RuleResult {
//!     match ctx.value {
//!         ouroboros_validator::Value::Int(n) if n % 2 == 0 => Ok(()),
//!         _ => Err(ctx.feedback("field must be even")),
//!     }
//! }
//!
//! let mut registry = Registry::builtin();
//! registry.register_validator("even", even);
//! assert!(registry.contains("even"));
//! assert!(registry.contains("required"));
//! ```

use crate::context::{RuleResult, ValidationContext};
use crate::errors::Feedback;
use crate::rules;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// Validator / Feedback Handler Traits
// ============================================================================

/// A rule function registered under a flag
///
/// Implemented for every `Fn(&ValidationContext<'_>) -> RuleResult`, so plain
/// functions and closures with an annotated argument can be registered.
pub trait Validator: Send + Sync {
    fn validate(&self, ctx: &ValidationContext<'_>) -> RuleResult;
}

impl<F> Validator for F
where
    F: Fn(&ValidationContext<'_>) -> RuleResult + Send + Sync,
{
    fn validate(&self, ctx: &ValidationContext<'_>) -> RuleResult {
        self(ctx)
    }
}

/// Produces the human-readable message for a failed rule
///
/// The [`Feedback`] passed in carries the rule's default message.
pub trait FeedbackHandler: Send + Sync {
    fn handle(&self, feedback: &Feedback) -> String;
}

impl<F> FeedbackHandler for F
where
    F: Fn(&Feedback) -> String + Send + Sync,
{
    fn handle(&self, feedback: &Feedback) -> String {
        self(feedback)
    }
}

/// Type alias for a shared validator
pub type BoxedValidator = Arc<dyn Validator>;

/// Type alias for a shared feedback handler
pub type BoxedFeedbackHandler = Arc<dyn FeedbackHandler>;

// ============================================================================
// Registry
// ============================================================================

/// Flag → rule function and flag → feedback handler mappings
#[derive(Clone, Default)]
pub struct Registry {
    validators: HashMap<String, BoxedValidator>,
    feedback_handlers: HashMap<String, BoxedFeedbackHandler>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in rule library
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        rules::register_builtin(&mut registry);
        registry
    }

    /// Register or replace the rule function for `flag`
    pub fn register_validator(&mut self, flag: impl Into<String>, validator: impl Validator + 'static) {
        self.insert_validator(flag.into(), Arc::new(validator));
    }

    /// Register or replace an already shared rule function
    pub fn insert_validator(&mut self, flag: String, validator: BoxedValidator) {
        if self.validators.insert(flag.clone(), validator).is_some() {
            tracing::debug!("Replaced validator '{}'", flag);
        }
    }

    /// Register or replace the feedback handler for `flag`
    pub fn register_feedback_handler(
        &mut self,
        flag: impl Into<String>,
        handler: impl FeedbackHandler + 'static,
    ) {
        self.insert_feedback_handler(flag.into(), Arc::new(handler));
    }

    /// Register or replace an already shared feedback handler
    pub fn insert_feedback_handler(&mut self, flag: String, handler: BoxedFeedbackHandler) {
        if self.feedback_handlers.insert(flag.clone(), handler).is_some() {
            tracing::debug!("Replaced feedback handler '{}'", flag);
        }
    }

    /// Rule function for `flag`
    pub fn validator(&self, flag: &str) -> Option<BoxedValidator> {
        self.validators.get(flag).cloned()
    }

    /// Feedback handler for `flag`
    pub fn feedback_handler(&self, flag: &str) -> Option<BoxedFeedbackHandler> {
        self.feedback_handlers.get(flag).cloned()
    }

    /// Whether a rule function is registered for `flag`
    pub fn contains(&self, flag: &str) -> bool {
        self.validators.contains_key(flag)
    }

    /// Registered flags, sorted
    pub fn flags(&self) -> Vec<&str> {
        let mut flags: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        flags.sort_unstable();
        flags
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut handlers: Vec<&String> = self.feedback_handlers.keys().collect();
        handlers.sort_unstable();
        f.debug_struct("Registry")
            .field("validators", &self.flags())
            .field("feedback_handlers", &handlers)
            .finish()
    }
}

// ============================================================================
// Process-wide Default Registry
// ============================================================================

static DEFAULT_REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::builtin()));

/// Snapshot of the process-wide default registry
pub fn default_registry() -> Registry {
    DEFAULT_REGISTRY.read().clone()
}

/// Register a rule function in the default registry
///
/// Only engines created afterwards see it.
pub fn register_default_validator(flag: impl Into<String>, validator: impl Validator + 'static) {
    let flag = flag.into();
    tracing::debug!("Registering default validator '{}'", flag);
    DEFAULT_REGISTRY.write().insert_validator(flag, Arc::new(validator));
}

/// Register a feedback handler in the default registry
pub fn register_default_feedback_handler(
    flag: impl Into<String>,
    handler: impl FeedbackHandler + 'static,
) {
    let flag = flag.into();
    tracing::debug!("Registering default feedback handler '{}'", flag);
    DEFAULT_REGISTRY.write().insert_feedback_handler(flag, Arc::new(handler));
}
