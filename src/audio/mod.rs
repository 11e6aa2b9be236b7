// Audio module - payload ingestion into analysis-ready PCM
//
// Pipeline: encoded bytes → format resolution → decode (hound / symphonia)
// → mono mixdown → resample to ANALYSIS_SAMPLE_RATE → AudioSample

mod decode;
pub mod format;
pub mod ingest;
mod resample;
pub mod sample;

// Re-export commonly used types for convenience
pub use format::AudioFormat;
pub use ingest::AudioIngestor;
pub use sample::{AudioSample, ANALYSIS_SAMPLE_RATE};
