// Ingestion error types and constants

use crate::error::ErrorCode;
use log::warn;
use std::fmt;

/// Ingestion error code constants
///
/// These constants are the single source of truth for the codes reported
/// to the request boundary (HTTP error bodies, CLI error output).
///
/// Error code range: 3001-3003
pub struct IngestionErrorCodes {}

impl IngestionErrorCodes {
    /// Payload is malformed, corrupt or decodes to nothing
    pub const DECODE: i32 = 3001;

    /// Encoded or decoded payload exceeds the configured maximum
    pub const SIZE_LIMIT: i32 = 3002;

    /// Container is not in the configured allow-list
    pub const UNSUPPORTED_FORMAT: i32 = 3003;
}

/// Log an ingestion error with structured context
///
/// Ingestion errors are caused by the submitted payload, so they are
/// logged at warn level.
pub fn log_ingestion_error(err: &IngestionError, context: &str) {
    warn!(
        "Ingestion error in {}: code={}, component=AudioIngestor, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Which size guard rejected the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeStage {
    /// Raw encoded bytes as received
    Encoded,
    /// Decoded PCM (f32, interleaved, native rate)
    Decoded,
}

impl SizeStage {
    fn as_str(&self) -> &'static str {
        match self {
            SizeStage::Encoded => "encoded",
            SizeStage::Decoded => "decoded",
        }
    }
}

/// Audio ingestion errors
///
/// These are the only errors the detection pipeline propagates to its
/// caller. No partial result accompanies any of them.
///
/// Error code range: 3001-3003
#[derive(Debug, Clone, PartialEq)]
pub enum IngestionError {
    /// Payload could not be decoded
    Decode { reason: String },

    /// Payload exceeds the configured maximum
    SizeLimit {
        stage: SizeStage,
        actual: usize,
        limit: usize,
    },

    /// Container format not allowed or not recognized
    UnsupportedFormat { format: String },
}

impl IngestionError {
    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        IngestionError::Decode {
            reason: reason.into(),
        }
    }
}

impl ErrorCode for IngestionError {
    fn code(&self) -> i32 {
        match self {
            IngestionError::Decode { .. } => IngestionErrorCodes::DECODE,
            IngestionError::SizeLimit { .. } => IngestionErrorCodes::SIZE_LIMIT,
            IngestionError::UnsupportedFormat { .. } => IngestionErrorCodes::UNSUPPORTED_FORMAT,
        }
    }

    fn message(&self) -> String {
        match self {
            IngestionError::Decode { reason } => format!("Failed to decode audio: {}", reason),
            IngestionError::SizeLimit {
                stage,
                actual,
                limit,
            } => format!(
                "Audio {} size {} bytes exceeds limit of {} bytes",
                stage.as_str(),
                actual,
                limit
            ),
            IngestionError::UnsupportedFormat { format } => {
                format!(
                    "Unsupported audio format '{}' (allowed: mp3, wav, ogg, m4a, flac)",
                    format
                )
            }
        }
    }
}

impl fmt::Display for IngestionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            IngestionError::Decode { .. } => "Decode",
            IngestionError::SizeLimit { .. } => "SizeLimit",
            IngestionError::UnsupportedFormat { .. } => "UnsupportedFormat",
        };
        write!(
            f,
            "IngestionError::{} (code {}): {}",
            variant,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for IngestionError {}

impl From<hound::Error> for IngestionError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::FormatError(reason) => IngestionError::decode(reason),
            hound::Error::Unsupported => IngestionError::decode("unsupported WAV encoding"),
            other => IngestionError::decode(other.to_string()),
        }
    }
}

impl From<symphonia::core::errors::Error> for IngestionError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        IngestionError::decode(err.to_string())
    }
}

impl From<rubato::ResamplerConstructionError> for IngestionError {
    fn from(err: rubato::ResamplerConstructionError) -> Self {
        IngestionError::decode(format!("resampler setup failed: {}", err))
    }
}

impl From<rubato::ResampleError> for IngestionError {
    fn from(err: rubato::ResampleError) -> Self {
        IngestionError::decode(format!("resampling failed: {}", err))
    }
}
