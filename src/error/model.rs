// Trained-model error types and constants

use crate::error::ErrorCode;
use log::warn;
use std::fmt;
use std::path::PathBuf;

/// Model error code constants
///
/// Error code range: 4001-4004
pub struct ModelLoadErrorCodes {}

impl ModelLoadErrorCodes {
    /// Artifact path does not exist
    pub const MISSING: i32 = 4001;

    /// Artifact could not be read
    pub const IO: i32 = 4002;

    /// Artifact is not valid JSON for the expected schema
    pub const PARSE: i32 = 4003;

    /// Artifact parsed but its contents are unusable
    pub const INVALID: i32 = 4004;
}

/// Log a model error with structured context
///
/// Model errors never fail a request, so they are logged at warn level
/// before the classifier falls back to the rule-based scorer.
pub fn log_model_error(err: &ModelLoadError, context: &str) {
    warn!(
        "Model error in {}: code={}, component=Classifier, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Trained-model artifact errors
///
/// Recovered locally: the classifier selects the rule-based scorer.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelLoadError {
    /// Artifact file not found
    Missing { path: PathBuf },

    /// Artifact file could not be read
    Io { path: PathBuf, details: String },

    /// Artifact JSON malformed
    Parse { path: PathBuf, details: String },

    /// Artifact semantically invalid (wrong format tag, non-finite weights, ...)
    Invalid { reason: String },
}

impl ErrorCode for ModelLoadError {
    fn code(&self) -> i32 {
        match self {
            ModelLoadError::Missing { .. } => ModelLoadErrorCodes::MISSING,
            ModelLoadError::Io { .. } => ModelLoadErrorCodes::IO,
            ModelLoadError::Parse { .. } => ModelLoadErrorCodes::PARSE,
            ModelLoadError::Invalid { .. } => ModelLoadErrorCodes::INVALID,
        }
    }

    fn message(&self) -> String {
        match self {
            ModelLoadError::Missing { path } => {
                format!("Model artifact not found: {}", path.display())
            }
            ModelLoadError::Io { path, details } => {
                format!("Failed to read model artifact {}: {}", path.display(), details)
            }
            ModelLoadError::Parse { path, details } => {
                format!("Failed to parse model artifact {}: {}", path.display(), details)
            }
            ModelLoadError::Invalid { reason } => format!("Invalid model artifact: {}", reason),
        }
    }
}

impl fmt::Display for ModelLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            ModelLoadError::Missing { .. } => "Missing",
            ModelLoadError::Io { .. } => "Io",
            ModelLoadError::Parse { .. } => "Parse",
            ModelLoadError::Invalid { .. } => "Invalid",
        };
        write!(
            f,
            "ModelLoadError::{} (code {}): {}",
            variant,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ModelLoadError {}
