// Speech recognition error types and constants

use crate::error::ErrorCode;
use std::fmt;

/// Recognition error code constants
///
/// Error code range: 5001
pub struct RecognitionErrorCodes {}

impl RecognitionErrorCodes {
    /// Speech-to-text pass not available or failed
    pub const UNAVAILABLE: i32 = 5001;
}

/// Speech-to-text pass could not produce a transcript
///
/// Recovered locally by the language resolver, which moves on to the
/// acoustic heuristics and finally the default language.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionUnavailable {
    /// No recognizer is plugged into the resolver
    NotConfigured,

    /// The recognizer ran and failed
    Failed { reason: String },
}

impl ErrorCode for RecognitionUnavailable {
    fn code(&self) -> i32 {
        RecognitionErrorCodes::UNAVAILABLE
    }

    fn message(&self) -> String {
        match self {
            RecognitionUnavailable::NotConfigured => "no speech recognizer configured".to_string(),
            RecognitionUnavailable::Failed { reason } => {
                format!("speech recognition failed: {}", reason)
            }
        }
    }
}

impl fmt::Display for RecognitionUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RecognitionUnavailable (code {}): {}",
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for RecognitionUnavailable {}
