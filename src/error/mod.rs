// Error types for the voice authenticity engine
//
// This module defines the error taxonomy of the detection pipeline. Only
// ingestion errors are surfaced to callers; model loading and speech
// recognition failures are absorbed by their fallback chains and logged.

mod ingestion;
mod model;
mod recognition;

pub use ingestion::{log_ingestion_error, IngestionError, IngestionErrorCodes, SizeStage};
pub use model::{log_model_error, ModelLoadError, ModelLoadErrorCodes};
pub use recognition::{RecognitionErrorCodes, RecognitionUnavailable};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, so the request boundary can map each kind
/// to an appropriate client-facing status.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
