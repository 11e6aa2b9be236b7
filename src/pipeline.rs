// DetectionPipeline - one request from encoded bytes to DetectionReport
//
// Ingestion → FeatureExtractor → LanguageResolver → Classifier → explain.
// Every stage is read-only after construction, so a single pipeline can be
// shared (Arc) across worker threads. The decoded sample lives only for the
// duration of one `detect` call.

use serde::Serialize;
use std::time::Instant;

use crate::analysis::{FeatureExtractor, FeatureVector};
use crate::audio::AudioIngestor;
use crate::classifier::{Classifier, Label, ScorerKind};
use crate::config::AppConfig;
use crate::error::{log_ingestion_error, IngestionError};
use crate::explanation::explain;
use crate::language::{
    Language, LanguageHint, LanguageHypothesis, LanguageResolver, SpeechRecognizer,
};

/// Structured result of one detection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionReport {
    pub classification: Label,
    pub confidence: f32,
    /// Display name of the resolved language
    pub language: String,
    pub language_code: Language,
    pub language_detection: LanguageHypothesis,
    pub explanation: String,
    pub characteristics: FeatureVector,
    pub scorer: ScorerKind,
}

pub struct DetectionPipeline {
    ingestor: AudioIngestor,
    extractor: FeatureExtractor,
    resolver: LanguageResolver,
    classifier: Classifier,
}

impl DetectionPipeline {
    /// Build every stage from configuration, without speech recognition
    pub fn from_config(config: &AppConfig) -> Self {
        Self::assemble(config, LanguageResolver::new(&config.language))
    }

    /// Build every stage from configuration with a speech recognizer
    pub fn with_recognizer(config: &AppConfig, recognizer: Box<dyn SpeechRecognizer>) -> Self {
        Self::assemble(
            config,
            LanguageResolver::with_recognizer(&config.language, recognizer),
        )
    }

    fn assemble(config: &AppConfig, resolver: LanguageResolver) -> Self {
        let classifier = Classifier::from_config(&config.classifier);
        tracing::info!(
            "[DetectionPipeline] Ready: scorer={}, max_encoded_bytes={}",
            classifier.scorer_kind(),
            config.ingestion.max_encoded_bytes
        );

        Self {
            ingestor: AudioIngestor::new(&config.ingestion),
            extractor: FeatureExtractor::new(&config.features),
            resolver,
            classifier,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn max_encoded_bytes(&self) -> usize {
        self.ingestor.max_encoded_bytes()
    }

    /// Run the full detection for one payload
    ///
    /// # Arguments
    /// * `payload` - Encoded audio bytes (already transport-decoded)
    /// * `declared_format` - Optional extension or MIME type
    /// * `hint` - Language hint; explicit languages are trusted as-is
    ///
    /// # Errors
    /// Only ingestion failures surface; model and recognition problems are
    /// absorbed by their fallbacks. No partial report accompanies an error.
    pub fn detect(
        &self,
        payload: &[u8],
        declared_format: Option<&str>,
        hint: LanguageHint,
    ) -> Result<DetectionReport, IngestionError> {
        let started = Instant::now();

        let sample = self
            .ingestor
            .ingest(payload, declared_format)
            .inspect_err(|err| log_ingestion_error(err, "DetectionPipeline::detect"))?;

        let analysis = self.extractor.analyze(&sample);
        let hypothesis = self.resolver.resolve(&sample, &analysis, hint);
        let duration_secs = sample.duration_secs();
        drop(sample);

        let result = self.classifier.classify_with(
            &analysis.features,
            Some(&analysis.descriptors),
            Some(hypothesis.language),
        );
        let explanation = explain(&result, hypothesis.language);

        tracing::info!(
            "[DetectionPipeline] {} ({:.3}) lang={} via {:?}, {:.2}s audio in {} ms",
            result.label,
            result.confidence,
            hypothesis.language.code(),
            hypothesis.method,
            duration_secs,
            started.elapsed().as_millis()
        );

        Ok(DetectionReport {
            classification: result.label,
            confidence: result.confidence,
            language: hypothesis.language.name().to_string(),
            language_code: hypothesis.language,
            language_detection: hypothesis,
            explanation,
            characteristics: result.features,
            scorer: result.scorer,
        })
    }
}
