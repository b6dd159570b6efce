//! Error types for the volume manager plugin
//!
//! Model findings are never errors: they are collected as
//! [`ValidationError`](crate::domain::ValidationError) reports. The types
//! here cover loading, configuration and model resolution failures.

use thiserror::Error;

/// Unified error type for the plugin
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Model Errors
    // =========================================================================
    #[error("No root volume group found in storage profile {profile}")]
    RootVolumeGroupUnresolved { profile: String },

    #[error("Unknown {kind} reference: {name}")]
    UnknownReference { kind: String, name: String },

    #[error("Duplicate {kind}: {name}")]
    DuplicateItem { kind: String, name: String },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error was caused by the model contents rather than
    /// by the environment
    pub fn is_model_error(&self) -> bool {
        matches!(
            self,
            Error::RootVolumeGroupUnresolved { .. }
                | Error::UnknownReference { .. }
                | Error::DuplicateItem { .. }
                | Error::Yaml(_)
        )
    }

    /// Process exit code used by the CLI for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Configuration(_) => 78,
            Error::Io(_) => 74,
            _ if self.is_model_error() => 65,
            _ => 70,
        }
    }
}

/// Result type alias for the plugin
pub type Result<T> = std::result::Result<T, Error>;
