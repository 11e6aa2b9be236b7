// AudioIngestor - encoded payload to analysis-ready AudioSample
//
// Guards run in order: encoded size, format resolution, decoded size
// (inside the decoder), empty output. Nothing is retained between calls.

use super::decode::decode;
use super::format::AudioFormat;
use super::resample::resample;
use super::sample::{AudioSample, ANALYSIS_SAMPLE_RATE};
use crate::config::IngestionConfig;
use crate::error::{IngestionError, SizeStage};

/// Stateless decoder front end configured with size limits and an allow-list
#[derive(Debug, Clone)]
pub struct AudioIngestor {
    max_encoded_bytes: usize,
    max_decoded_bytes: usize,
    allowed_formats: Vec<AudioFormat>,
}

impl AudioIngestor {
    pub fn new(config: &IngestionConfig) -> Self {
        Self {
            max_encoded_bytes: config.max_encoded_bytes,
            max_decoded_bytes: config.max_decoded_bytes,
            allowed_formats: config.allowed_formats.clone(),
        }
    }

    pub fn max_encoded_bytes(&self) -> usize {
        self.max_encoded_bytes
    }

    /// Decode `bytes` into a mono AudioSample at ANALYSIS_SAMPLE_RATE
    ///
    /// # Arguments
    /// * `bytes` - Encoded payload (already transport-decoded)
    /// * `declared_format` - Optional extension or MIME type from the caller
    ///
    /// # Errors
    /// * `SizeLimit` - payload larger than `max_encoded_bytes`, or decoded
    ///   PCM larger than `max_decoded_bytes`
    /// * `UnsupportedFormat` - container unknown or not allowed
    /// * `Decode` - corrupt payload, empty payload, or no samples decoded
    pub fn ingest(
        &self,
        bytes: &[u8],
        declared_format: Option<&str>,
    ) -> Result<AudioSample, IngestionError> {
        if bytes.len() > self.max_encoded_bytes {
            return Err(IngestionError::SizeLimit {
                stage: SizeStage::Encoded,
                actual: bytes.len(),
                limit: self.max_encoded_bytes,
            });
        }
        if bytes.is_empty() {
            return Err(IngestionError::decode("empty payload"));
        }

        let format = AudioFormat::resolve(bytes, declared_format, &self.allowed_formats)?;
        let decoded = decode(bytes, format, self.max_decoded_bytes)?;

        if decoded.mono.is_empty() {
            return Err(IngestionError::decode(format!(
                "{} payload decoded to zero samples",
                format
            )));
        }

        log::debug!(
            "[AudioIngestor] Decoded {} payload: {} bytes, {} ch @ {} Hz, {} mono samples",
            format,
            bytes.len(),
            decoded.channels,
            decoded.sample_rate,
            decoded.mono.len()
        );

        let samples = resample(decoded.mono, decoded.sample_rate, ANALYSIS_SAMPLE_RATE)?;
        if samples.is_empty() {
            return Err(IngestionError::decode("resampling produced zero samples"));
        }

        Ok(AudioSample::new(ANALYSIS_SAMPLE_RATE, samples))
    }
}

impl Default for AudioIngestor {
    fn default() -> Self {
        Self::new(&IngestionConfig::default())
    }
}
