//! Engine configuration
//!
//! Controls which field annotations the engine reads.

use crate::types::{DEFAULT_FEEDBACK_TAG_NAME, DEFAULT_TAG_NAME};

/// Configuration options for an [`Engine`](crate::engine::Engine)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Annotation holding the rule list
    pub tag_name: String,

    /// Annotation holding the static feedback override
    pub feedback_tag_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tag_name: DEFAULT_TAG_NAME.to_string(),
            feedback_tag_name: DEFAULT_FEEDBACK_TAG_NAME.to_string(),
        }
    }
}

impl EngineConfig {
    /// Create a config with the default tag names
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rule annotation name
    pub fn tag_name(mut self, name: impl Into<String>) -> Self {
        self.tag_name = name.into();
        self
    }

    /// Set the static feedback annotation name
    pub fn feedback_tag_name(mut self, name: impl Into<String>) -> Self {
        self.feedback_tag_name = name.into();
        self
    }
}
