// Classifier - voice authenticity scoring
//
// This module maps a FeatureVector (optionally conditioned on the resolved
// language) to a label, a calibrated confidence and per-feature
// contributions. Two scorers share one output contract:
//
// - RuleBasedScorer: fixed weighted indicators squashed by a logistic
// - TrainedScorer: logistic regression loaded from a JSON artifact, which
//   may also weight the auxiliary descriptors (MFCCs, spectral shape)
//
// The scorer is chosen once at construction. A trained model that fails to
// load leaves the rule-based scorer in place; a trained prediction that is
// not finite is replaced by the rule-based result for that request only.

mod rule_based;
mod trained;

pub use rule_based::RuleBasedScorer;
pub use trained::{
    AuxiliaryCoefficients, FeatureCoefficients, ModelArtifact, TrainedScorer, MODEL_FORMAT,
    MODEL_VERSION,
};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analysis::{AuxiliaryDescriptors, FeatureName, FeatureVector};
use crate::config::ClassifierConfig;
use crate::error::log_model_error;
use crate::language::Language;

/// Authenticity verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "AI_GENERATED")]
    AiGenerated,
    #[serde(rename = "HUMAN")]
    Human,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::AiGenerated => "AI_GENERATED",
            Label::Human => "HUMAN",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which scorer produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    RuleBased,
    Trained,
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScorerKind::RuleBased => "rule_based",
            ScorerKind::Trained => "trained",
        })
    }
}

/// Signed share of the raw score attributable to one feature
///
/// Positive values push towards AI_GENERATED, negative towards HUMAN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: FeatureName,
    pub contribution: f32,
}

/// Output of one classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub label: Label,
    /// Probability of the reported label, in [0, 1]
    pub confidence: f32,
    /// Calibrated probability of AI_GENERATED, monotonic in `raw_score`
    pub ai_probability: f32,
    /// Sum of all contributions, before calibration
    pub raw_score: f32,
    /// One entry per feature, in schema order
    pub contributions: Vec<FeatureContribution>,
    pub features: FeatureVector,
    pub scorer: ScorerKind,
}

impl ClassificationResult {
    /// Assemble a result from contributions and the AI probability
    pub(crate) fn from_parts(
        label: Label,
        ai_probability: f32,
        contributions: Vec<FeatureContribution>,
        features: FeatureVector,
        scorer: ScorerKind,
    ) -> Self {
        let ai_probability = ai_probability.clamp(0.0, 1.0);
        let confidence = match label {
            Label::AiGenerated => ai_probability,
            Label::Human => 1.0 - ai_probability,
        }
        .clamp(0.0, 1.0);
        let raw_score = contributions.iter().map(|c| c.contribution).sum();

        Self {
            label,
            confidence,
            ai_probability,
            raw_score,
            contributions,
            features,
            scorer,
        }
    }

    pub fn contribution(&self, feature: FeatureName) -> f32 {
        self.contributions
            .iter()
            .find(|c| c.feature == feature)
            .map(|c| c.contribution)
            .unwrap_or(0.0)
    }

    fn is_finite(&self) -> bool {
        self.confidence.is_finite()
            && self.ai_probability.is_finite()
            && self.raw_score.is_finite()
            && self.contributions.iter().all(|c| c.contribution.is_finite())
    }
}

/// Rule-based weight per feature
///
/// Weights are magnitudes; each feature's direction is fixed by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureWeights {
    pub pitch_variance: f32,
    pub spectral_flatness: f32,
    pub natural_pauses: f32,
    pub speech_rate: f32,
    pub emotion_variance: f32,
    pub background_noise: f32,
}

impl FeatureWeights {
    pub fn get(&self, name: FeatureName) -> f32 {
        match name {
            FeatureName::PitchVariance => self.pitch_variance,
            FeatureName::SpectralFlatness => self.spectral_flatness,
            FeatureName::NaturalPauses => self.natural_pauses,
            FeatureName::SpeechRate => self.speech_rate,
            FeatureName::EmotionVariance => self.emotion_variance,
            FeatureName::BackgroundNoise => self.background_noise,
        }
    }
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            pitch_variance: 0.25,
            spectral_flatness: 0.20,
            natural_pauses: 0.10,
            speech_rate: 0.10,
            emotion_variance: 0.20,
            background_noise: 0.05,
        }
    }
}

/// Scoring strategy
pub trait Scorer: Send + Sync {
    fn kind(&self) -> ScorerKind;

    /// Score a feature vector, with the auxiliary descriptors when available
    ///
    /// Returns None when the prediction is not usable (non-finite output).
    fn score(
        &self,
        features: &FeatureVector,
        descriptors: Option<&AuxiliaryDescriptors>,
        language: Option<Language>,
    ) -> Option<ClassificationResult>;
}

/// Logistic function, numerically stable for large |x|
pub(crate) fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Authenticity classifier holding one selected scorer
///
/// Read-only after construction; share it behind an `Arc`.
pub struct Classifier {
    scorer: Box<dyn Scorer>,
    fallback: RuleBasedScorer,
}

impl Classifier {
    /// Build the classifier from configuration
    ///
    /// Loads the trained-model artifact when `model_path` is set. Any load
    /// failure is logged and the rule-based scorer is used instead.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let fallback = RuleBasedScorer::new(config);

        let scorer: Box<dyn Scorer> = match &config.model_path {
            Some(path) => match TrainedScorer::load(path) {
                Ok(trained) => {
                    log::info!("[Classifier] Loaded trained model from {}", path.display());
                    Box::new(trained)
                }
                Err(err) => {
                    log_model_error(&err, "Classifier::from_config");
                    Box::new(fallback.clone())
                }
            },
            None => Box::new(fallback.clone()),
        };

        Self { scorer, fallback }
    }

    /// Use an explicitly constructed scorer, with the rule-based fallback
    /// calibrated from `config`
    pub fn with_scorer(config: &ClassifierConfig, scorer: Box<dyn Scorer>) -> Self {
        Self {
            scorer,
            fallback: RuleBasedScorer::new(config),
        }
    }

    pub fn scorer_kind(&self) -> ScorerKind {
        self.scorer.kind()
    }

    /// Whether a trained model is in use
    pub fn model_loaded(&self) -> bool {
        self.scorer.kind() == ScorerKind::Trained
    }

    /// Classify a feature vector
    ///
    /// Deterministic: the same vector and language always yield the same
    /// label, confidence and contributions.
    pub fn classify(
        &self,
        features: &FeatureVector,
        language: Option<Language>,
    ) -> ClassificationResult {
        self.classify_with(features, None, language)
    }

    /// Classify a feature vector together with its auxiliary descriptors
    ///
    /// Only trained models with auxiliary weights read the descriptors.
    pub fn classify_with(
        &self,
        features: &FeatureVector,
        descriptors: Option<&AuxiliaryDescriptors>,
        language: Option<Language>,
    ) -> ClassificationResult {
        let features = features.sanitized();
        let descriptors = descriptors.map(|d| d.sanitized());

        match self.scorer.score(&features, descriptors.as_ref(), language) {
            Some(result) if result.is_finite() => result,
            _ => {
                log::warn!(
                    "[Classifier] {} scorer produced no usable prediction, using rule-based result",
                    self.scorer.kind()
                );
                self.fallback.evaluate(&features, language)
            }
        }
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
