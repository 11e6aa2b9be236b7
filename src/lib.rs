// Voice Verify Core - voice authenticity decision engine
// Decodes speech, extracts prosodic/spectral features, resolves the spoken
// language and labels the sample AI_GENERATED or HUMAN with an explanation.

// Module declarations
pub mod analysis;
pub mod audio;
pub mod classifier;
pub mod config;
pub mod error;
pub mod explanation;
#[cfg(feature = "http")]
pub mod http;
pub mod language;
pub mod pipeline;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use analysis::{AuxiliaryDescriptors, FeatureExtractor, FeatureName, FeatureVector};
pub use audio::{AudioFormat, AudioIngestor, AudioSample};
pub use classifier::{ClassificationResult, Classifier, Label, ScorerKind};
pub use config::AppConfig;
pub use error::{ErrorCode, IngestionError};
pub use language::{Language, LanguageHint, LanguageHypothesis, LanguageResolver};
pub use pipeline::{DetectionPipeline, DetectionReport};
