//! Validation Reports

use serde::{Deserialize, Serialize};

/// A single validation finding against a model item.
///
/// Findings are collected, never raised: a pass reports everything wrong
/// with the model at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    /// Path of the offending item
    pub item_path: String,
    /// Human readable message
    pub message: String,
}

impl ValidationError {
    pub fn new(item_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            item_path: item_path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.item_path, self.message)
    }
}
