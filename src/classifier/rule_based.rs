// Rule-based scorer - weighted feature indicators
//
// Each scalar feature becomes an indicator a = clamp((v - pivot) / span, -1, 1)
// signed by the feature's direction; natural_pauses maps to -1 when present
// and +1 when absent. Contributions are weight × indicator and sum to the
// raw score. The decision threshold is folded into the pivots, so the label
// is AI_GENERATED exactly when the raw score is positive.

use super::{
    sigmoid, ClassificationResult, FeatureContribution, FeatureWeights, Label, Scorer, ScorerKind,
};
use crate::analysis::{AuxiliaryDescriptors, FeatureName, FeatureVector};
use crate::config::ClassifierConfig;
use crate::language::{profile, Language};

/// Smallest span accepted; keeps indicators finite under a zero-span config
const MIN_SPAN: f32 = 1e-6;

/// Direction in which a feature points towards AI_GENERATED
///
/// +1: high values indicate synthetic speech; -1: low values do.
fn direction(name: FeatureName) -> f32 {
    match name {
        FeatureName::SpectralFlatness | FeatureName::SpeechRate => 1.0,
        FeatureName::PitchVariance
        | FeatureName::EmotionVariance
        | FeatureName::BackgroundNoise
        | FeatureName::NaturalPauses => -1.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleBasedScorer {
    weights: FeatureWeights,
    pivot: f32,
    span: f32,
    steepness: f32,
    condition_on_language: bool,
}

impl RuleBasedScorer {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            weights: config.weights,
            pivot: config.pivot,
            span: config.span.max(MIN_SPAN),
            steepness: config.steepness,
            condition_on_language: config.condition_on_language,
        }
    }

    fn pivot_for(&self, name: FeatureName, language: Option<Language>) -> f32 {
        match (name, language) {
            (FeatureName::SpeechRate, Some(language)) if self.condition_on_language => {
                profile(language).speech_rate_centre()
            }
            _ => self.pivot,
        }
    }

    /// Signed indicator in [-1, 1]; positive points towards AI_GENERATED
    pub fn indicator(
        &self,
        name: FeatureName,
        features: &FeatureVector,
        language: Option<Language>,
    ) -> f32 {
        if name == FeatureName::NaturalPauses {
            return if features.natural_pauses { -1.0 } else { 1.0 };
        }
        let offset = (features.value(name) - self.pivot_for(name, language)) / self.span;
        offset.clamp(-1.0, 1.0) * direction(name)
    }

    /// Infallible scoring used both directly and as the fallback path
    pub fn evaluate(
        &self,
        features: &FeatureVector,
        language: Option<Language>,
    ) -> ClassificationResult {
        let contributions: Vec<FeatureContribution> = FeatureName::ALL
            .iter()
            .map(|&feature| FeatureContribution {
                feature,
                contribution: self.weights.get(feature) * self.indicator(feature, features, language),
            })
            .collect();

        let raw: f32 = contributions.iter().map(|c| c.contribution).sum();
        let label = if raw > 0.0 {
            Label::AiGenerated
        } else {
            Label::Human
        };

        ClassificationResult::from_parts(
            label,
            sigmoid(self.steepness * raw),
            contributions,
            *features,
            ScorerKind::RuleBased,
        )
    }
}

impl Default for RuleBasedScorer {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

impl Scorer for RuleBasedScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::RuleBased
    }

    fn score(
        &self,
        features: &FeatureVector,
        _descriptors: Option<&AuxiliaryDescriptors>,
        language: Option<Language>,
    ) -> Option<ClassificationResult> {
        Some(self.evaluate(features, language))
    }
}
