// Language module - spoken language resolution
//
// An explicit hint is trusted as-is. Otherwise the resolver walks an
// ordered strategy list (speech recognition, prosodic heuristics) and
// returns the first hypothesis that clears its threshold, falling back to
// the configured default language. Resolution never fails.

pub mod heuristic;
pub mod profiles;
pub mod recognition;

pub use profiles::{profile, LanguageProfile};
pub use recognition::{NoRecognizer, SpeechRecognizer, Transcript};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analysis::Analysis;
use crate::audio::AudioSample;
use crate::config::LanguageConfig;
use crate::error::{ErrorCode, RecognitionUnavailable};

/// Supported spoken languages, serialized as ISO 639-1 codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "ml")]
    Malayalam,
    #[serde(rename = "te")]
    Telugu,
}

impl Language {
    /// Fixed language order; also the tie-break order
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Tamil,
        Language::Hindi,
        Language::Malayalam,
        Language::Telugu,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Tamil => "ta",
            Language::Hindi => "hi",
            Language::Malayalam => "ml",
            Language::Telugu => "te",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Tamil => "Tamil",
            Language::Hindi => "Hindi",
            Language::Malayalam => "Malayalam",
            Language::Telugu => "Telugu",
        }
    }

    /// Parse a code or display name, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|language| {
            value.eq_ignore_ascii_case(language.code()) || value.eq_ignore_ascii_case(language.name())
        })
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Language::English => 0,
            Language::Tamil => 1,
            Language::Hindi => 2,
            Language::Malayalam => 3,
            Language::Telugu => 4,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Caller's language hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageHint {
    #[default]
    Auto,
    Explicit(Language),
}

impl LanguageHint {
    /// Parse a hint; `auto`, empty and unknown values all mean Auto
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
            return LanguageHint::Auto;
        }
        match Language::parse(trimmed) {
            Some(language) => LanguageHint::Explicit(language),
            None => {
                log::warn!(
                    "[LanguageResolver] Unsupported language hint '{}', detecting automatically",
                    trimmed
                );
                LanguageHint::Auto
            }
        }
    }
}

impl From<Option<&str>> for LanguageHint {
    fn from(value: Option<&str>) -> Self {
        value.map(LanguageHint::parse).unwrap_or_default()
    }
}

/// How the language was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMethod {
    Explicit,
    Recognized,
    Heuristic,
    Default,
}

/// Resolved language for one request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LanguageHypothesis {
    pub language: Language,
    pub method: ResolutionMethod,
    /// Confidence in [0, 1]
    pub confidence: f32,
}

/// Automatic resolution strategies, tried in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Recognized,
    Heuristic,
}

const STRATEGIES: [Strategy; 2] = [Strategy::Recognized, Strategy::Heuristic];

/// Resolves the spoken language of a sample
pub struct LanguageResolver {
    config: LanguageConfig,
    recognizer: Box<dyn SpeechRecognizer>,
}

impl LanguageResolver {
    /// Resolver without speech recognition
    pub fn new(config: &LanguageConfig) -> Self {
        Self::with_recognizer(config, Box::new(NoRecognizer))
    }

    pub fn with_recognizer(config: &LanguageConfig, recognizer: Box<dyn SpeechRecognizer>) -> Self {
        Self {
            config: config.clone(),
            recognizer,
        }
    }

    /// Resolve the language of `sample`
    ///
    /// # Arguments
    /// * `sample` - Decoded audio, passed to the recognizer
    /// * `analysis` - Features and prosody from the same sample, for the heuristics
    /// * `hint` - Caller's hint; an explicit language short-circuits everything
    pub fn resolve(
        &self,
        sample: &AudioSample,
        analysis: &Analysis,
        hint: LanguageHint,
    ) -> LanguageHypothesis {
        if let LanguageHint::Explicit(language) = hint {
            return LanguageHypothesis {
                language,
                method: ResolutionMethod::Explicit,
                confidence: 1.0,
            };
        }

        for strategy in STRATEGIES {
            let hypothesis = match strategy {
                Strategy::Recognized => self.try_recognized(sample),
                Strategy::Heuristic => self.try_heuristic(analysis),
            };
            if let Some(hypothesis) = hypothesis {
                log::debug!("[LanguageResolver] {:?} via {:?}", hypothesis, strategy);
                return hypothesis;
            }
        }

        LanguageHypothesis {
            language: self.config.default_language,
            method: ResolutionMethod::Default,
            confidence: 0.0,
        }
    }

    fn try_recognized(&self, sample: &AudioSample) -> Option<LanguageHypothesis> {
        let transcript = match self.recognizer.transcribe(sample) {
            Ok(transcript) => transcript,
            Err(err) => {
                match err {
                    RecognitionUnavailable::NotConfigured => log::debug!(
                        "[LanguageResolver] Recognition skipped: code={}, {}",
                        err.code(),
                        err.message()
                    ),
                    RecognitionUnavailable::Failed { .. } => log::warn!(
                        "[LanguageResolver] Recognition unavailable: code={}, {}",
                        err.code(),
                        err.message()
                    ),
                }
                return None;
            }
        };

        let (language, share) = recognition::dominant_script(&transcript.text)?;
        let transcript_confidence = if transcript.confidence.is_finite() {
            transcript.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let confidence = transcript_confidence * share;

        if confidence > self.config.recognition_confidence_threshold {
            Some(LanguageHypothesis {
                language,
                method: ResolutionMethod::Recognized,
                confidence,
            })
        } else {
            log::debug!(
                "[LanguageResolver] Transcript rejected: {} at {:.2} <= {:.2}",
                language.code(),
                confidence,
                self.config.recognition_confidence_threshold
            );
            None
        }
    }

    fn try_heuristic(&self, analysis: &Analysis) -> Option<LanguageHypothesis> {
        if analysis.prosody.voiced_frames < self.config.min_voiced_frames {
            return None;
        }

        let (language, confidence) = heuristic::infer(&analysis.features, &analysis.prosody);
        if confidence < self.config.heuristic_min_confidence {
            return None;
        }

        Some(LanguageHypothesis {
            language,
            method: ResolutionMethod::Heuristic,
            confidence,
        })
    }
}
