//! Validation error types
//!
//! Two disjoint kinds of failure come out of [`Engine::validate`]:
//!
//! - [`ConfigError`]: a misuse of the rule grammar (unknown flag, malformed
//!   parameter, rule applied to an unsupported kind, ...). Fatal, aborts the
//!   whole call and is never accumulated.
//! - [`ValidationError`]: the accumulated, field-indexed report of data
//!   failures ([`Feedback`]).
//!
//! [`Engine::validate`]: crate::Engine::validate

use crate::types::Kind;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for validation calls
pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// Top-level Error
// ============================================================================

/// Error returned by a validation call
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// One or more fields hold values that violate their rules
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The rule annotations themselves are wrong
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Returns the field report if this is a data failure
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(e) => Some(e),
            Error::Config(_) => None,
        }
    }

    /// Returns the configuration error if this is one
    pub fn as_config(&self) -> Option<&ConfigError> {
        match self {
            Error::Config(e) => Some(e),
            Error::Validation(_) => None,
        }
    }

    /// Returns true if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

// ============================================================================
// Configuration Error
// ============================================================================

/// Misconfigured validation (a programming error, not a data error)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unsupported value type '{kind}', only records can be validated")]
    UnsupportedValue { kind: Kind },

    #[error("invalid pointer: cannot validate a nil record")]
    NilPointer,

    #[error("<Field:{field} Validator:{flag}> unregistered validator '{flag}'")]
    UnknownFlag { field: String, flag: String },

    #[error("<Field:{field} Validator:{flag}> invalid param '{param}': {reason}")]
    InvalidParam {
        field: String,
        flag: String,
        param: String,
        reason: String,
    },

    #[error("<Field:{field} Validator:{flag}> validator does not support '{kind}' type")]
    UnsupportedKind {
        field: String,
        flag: String,
        kind: Kind,
    },

    #[error("<Field:{field} Validator:{flag}> field '{target}' not found")]
    UnknownField {
        field: String,
        flag: String,
        target: String,
    },

    /// Raised by user-registered rules
    #[error("<Field:{field} Validator:{flag}> {message}")]
    Custom {
        field: String,
        flag: String,
        message: String,
    },
}

impl ConfigError {
    /// Field the error was raised for, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnsupportedValue { .. } | Self::NilPointer => None,
            Self::UnknownFlag { field, .. }
            | Self::InvalidParam { field, .. }
            | Self::UnsupportedKind { field, .. }
            | Self::UnknownField { field, .. }
            | Self::Custom { field, .. } => Some(field),
        }
    }

    /// Flag the error was raised for, if any
    pub fn flag(&self) -> Option<&str> {
        match self {
            Self::UnsupportedValue { .. } | Self::NilPointer => None,
            Self::UnknownFlag { flag, .. }
            | Self::InvalidParam { flag, .. }
            | Self::UnsupportedKind { flag, .. }
            | Self::UnknownField { flag, .. }
            | Self::Custom { flag, .. } => Some(flag),
        }
    }
}

// ============================================================================
// Feedback
// ============================================================================

/// A single data failure: why one field's value violates one rule
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Feedback {
    /// Field name
    pub field: String,
    /// Flag of the rule that failed
    pub flag: String,
    /// Parameter of the rule that failed
    pub param: String,
    /// Human-readable message
    pub message: String,
}

impl Feedback {
    /// Create a new feedback item
    pub fn new(
        field: impl Into<String>,
        flag: impl Into<String>,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            flag: flag.into(),
            param: param.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ============================================================================
// Translator
// ============================================================================

/// Rewrites feedback messages, e.g. for localization
///
/// Returning `None` keeps the original message.
pub trait Translator: Send + Sync {
    fn translate(&self, feedback: &Feedback) -> Option<String>;
}

impl<F> Translator for F
where
    F: Fn(&Feedback) -> Option<String> + Send + Sync,
{
    fn translate(&self, feedback: &Feedback) -> Option<String> {
        self(feedback)
    }
}

// ============================================================================
// Field Error
// ============================================================================

/// Aggregated feedback for one field
///
/// A `FieldError` does not hold the report's translator: its `Display`,
/// [`messages`](Self::messages) and serde output are untranslated. Use
/// [`render_with`](Self::render_with), or go through the owning
/// [`ValidationError`], for translated text.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Feedback in rule-evaluation order
    pub feedbacks: Vec<Feedback>,
    /// Static override that replaces every feedback message when set
    pub override_message: Option<String>,
}

impl FieldError {
    /// Create an empty field error
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            feedbacks: Vec::new(),
            override_message: None,
        }
    }

    /// Append one feedback item
    pub fn push(&mut self, feedback: Feedback) {
        self.feedbacks.push(feedback);
    }

    /// Check if the field has no feedback
    pub fn is_empty(&self) -> bool {
        self.feedbacks.is_empty() && self.override_message.is_none()
    }

    /// Collapse all feedback into a single override message
    pub fn collapse(&mut self, message: impl Into<String>) {
        self.override_message = Some(message.into());
    }

    /// Messages without translation
    pub fn messages(&self) -> Vec<String> {
        self.render(None)
    }

    /// Messages routed through `translator`, falling back per item
    ///
    /// The static override is returned as-is.
    pub fn render_with(&self, translator: &dyn Translator) -> Vec<String> {
        self.render(Some(translator))
    }

    fn render(&self, translator: Option<&dyn Translator>) -> Vec<String> {
        if let Some(message) = &self.override_message {
            return vec![message.clone()];
        }
        self.feedbacks
            .iter()
            .map(|feedback| {
                translator
                    .and_then(|t| t.translate(feedback))
                    .unwrap_or_else(|| feedback.message.clone())
            })
            .collect()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Field '{}' validation failure: {}",
            self.field,
            self.messages().join(";")
        )
    }
}

// ============================================================================
// Validation Error (structural report)
// ============================================================================

/// Field-indexed report of data failures
///
/// Field errors keep declaration order. Use [`ValidationError::fields`] when
/// order matters; [`ValidationError::to_map`] has none.
#[derive(Clone, Default)]
pub struct ValidationError {
    /// Field errors in declaration order
    pub errors: Vec<FieldError>,
    translator: Option<Arc<dyn Translator>>,
}

impl ValidationError {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are any field errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failing fields
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Add a field error; empty ones are ignored
    pub fn add(&mut self, error: FieldError) {
        if !error.is_empty() {
            self.errors.push(error);
        }
    }

    /// Convert to Result - Ok if no errors, Err if there are errors
    pub fn into_result(self) -> std::result::Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Field errors in declaration order
    pub fn fields(&self) -> &[FieldError] {
        &self.errors
    }

    /// Field error for `field`, if that field failed
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// Attach a translator used by every rendering path
    pub fn set_translator(&mut self, translator: impl Translator + 'static) {
        self.translator = Some(Arc::new(translator));
    }

    /// Attach a shared translator (builder style)
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Check if a translator is attached
    pub fn has_translator(&self) -> bool {
        self.translator.is_some()
    }

    /// Rendered (translated) messages of one field
    pub fn messages(&self, field: &str) -> Option<Vec<String>> {
        self.get(field)
            .map(|e| e.render(self.translator.as_deref()))
    }

    /// Render as field name -> messages joined with `;`
    pub fn to_map(&self) -> HashMap<String, String> {
        self.errors
            .iter()
            .map(|e| {
                (
                    e.field.clone(),
                    e.render(self.translator.as_deref()).join(";"),
                )
            })
            .collect()
    }
}

impl fmt::Debug for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationError")
            .field("errors", &self.errors)
            .field("translator", &self.translator.is_some())
            .finish()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "Field '{}' validation failure: {}",
                error.field,
                error.render(self.translator.as_deref()).join(";")
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Serializes as `{ "field": ..., "messages": [...] }` (untranslated)
#[cfg(feature = "serde")]
impl serde::Serialize for FieldError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("FieldError", 2)?;
        state.serialize_field("field", &self.field)?;
        state.serialize_field("messages", &self.messages())?;
        state.end()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ValidationError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(
            self.errors
                .iter()
                .map(|e| (&e.field, e.render(self.translator.as_deref()))),
        )
    }
}
