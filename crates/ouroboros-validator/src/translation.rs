//! Flag-keyed translation table
//!
//! [`TranslationTable`] maps a rule flag to a feedback handler producing the
//! localized message. Attach it to a report with
//! [`ValidationError::set_translator`](crate::errors::ValidationError::set_translator);
//! flags without an entry keep their original message.
//!
//! # Example
//!
//! ```
//! use ouroboros_validator::{Engine, Feedback, Field, Record, TranslationTable};
//!
//! let table = TranslationTable::new();
//! table.register("required", |f: &Feedback| format!("{}不能为空", f.field));
//!
//! let form = Record::new("Form").field(Field::new("Name", "").validate("required"));
//! let mut report = Engine::new().validate(&form).unwrap_err().as_validation().unwrap().clone();
//! report.set_translator(table);
//! assert_eq!(report.to_string(), "Field 'Name' validation failure: Name不能为空");
//! ```

use crate::errors::{Feedback, Translator};
use crate::registry::{BoxedFeedbackHandler, FeedbackHandler};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Thread-safe flag → handler table
#[derive(Default)]
pub struct TranslationTable {
    handlers: RwLock<HashMap<String, BoxedFeedbackHandler>>,
}

impl TranslationTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the handler for `flag`
    pub fn register(&self, flag: impl Into<String>, handler: impl FeedbackHandler + 'static) {
        self.handlers.write().insert(flag.into(), Arc::new(handler));
    }

    /// Check if `flag` has a translation
    pub fn contains(&self, flag: &str) -> bool {
        self.handlers.read().contains_key(flag)
    }

    /// Number of registered flags
    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    /// Check if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }
}

impl Translator for TranslationTable {
    fn translate(&self, feedback: &Feedback) -> Option<String> {
        let handler = self.handlers.read().get(&feedback.flag).cloned()?;
        Some(handler.handle(feedback))
    }
}

impl std::fmt::Debug for TranslationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.read();
        let mut flags: Vec<&String> = handlers.keys().collect();
        flags.sort_unstable();
        f.debug_struct("TranslationTable").field("flags", &flags).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FieldError, ValidationError};

    fn report() -> ValidationError {
        let mut name = FieldError::new("UserName");
        name.push(Feedback::new("UserName", "required", "", "field is required"));
        name.push(Feedback::new("UserName", "alpha", "", "field can only contain alphabetic characters"));

        let mut errors = ValidationError::new();
        errors.add(name);
        errors
    }

    #[test]
    fn test_empty_table_keeps_messages() {
        let table = TranslationTable::new();
        assert!(table.is_empty());

        let mut errors = report();
        errors.set_translator(table);
        assert_eq!(
            errors.messages("UserName").unwrap(),
            vec![
                "field is required".to_string(),
                "field can only contain alphabetic characters".to_string()
            ]
        );
    }

    #[test]
    fn test_partial_translation() {
        let table = TranslationTable::new();
        table.register("required", |f: &Feedback| format!("{}为必填字段", f.field));
        assert!(table.contains("required"));
        assert_eq!(table.len(), 1);

        let mut errors = report();
        errors.set_translator(table);
        assert_eq!(
            errors.to_map().get("UserName").map(String::as_str),
            Some("UserName为必填字段;field can only contain alphabetic characters")
        );
    }

    #[test]
    fn test_register_replaces() {
        let table = TranslationTable::new();
        table.register("alpha", |_: &Feedback| "只能包含字母".to_string());
        table.register("alpha", |_: &Feedback| "仅限字母".to_string());

        let feedback = Feedback::new("Nick", "alpha", "", "field can only contain alphabetic characters");
        assert_eq!(table.translate(&feedback), Some("仅限字母".to_string()));
        assert_eq!(table.len(), 1);
    }
}
