// Explanation - human-readable rationale for a classification
//
// Pure function of (ClassificationResult, Language): the strongest one to
// three contributions are phrased by their sign and listed after the
// verdict. Ranking uses a stable sort, so equal contributions keep schema
// order and the wording never varies between runs.

use crate::analysis::FeatureName;
use crate::classifier::{ClassificationResult, FeatureContribution, Label};
use crate::language::Language;

/// Most indicators named in one explanation
const MAX_INDICATORS: usize = 3;

/// Contributions at or below this magnitude are not worth naming
const MIN_CONTRIBUTION: f32 = 1e-6;

/// Below this confidence the verdict is flagged as inconclusive
const CONFIDENT_THRESHOLD: f32 = 0.6;

/// Phrase for a feature pushing towards AI_GENERATED / towards HUMAN
fn phrase(feature: FeatureName, towards_ai: bool) -> &'static str {
    match (feature, towards_ai) {
        (FeatureName::PitchVariance, true) => "uniform pitch",
        (FeatureName::PitchVariance, false) => "natural pitch variation",
        (FeatureName::SpectralFlatness, true) => "synthetic spectral texture",
        (FeatureName::SpectralFlatness, false) => "natural spectral content",
        (FeatureName::NaturalPauses, true) => "absence of natural pauses",
        (FeatureName::NaturalPauses, false) => "natural pause pattern",
        (FeatureName::SpeechRate, true) => "unusually steady speech rhythm",
        (FeatureName::SpeechRate, false) => "natural speech rhythm",
        (FeatureName::EmotionVariance, true) => "limited emotional expression",
        (FeatureName::EmotionVariance, false) => "dynamic emotional expression",
        (FeatureName::BackgroundNoise, true) => "unusually clean audio",
        (FeatureName::BackgroundNoise, false) => "natural ambient sound",
    }
}

/// Strongest contributions, largest magnitude first, ties in schema order
pub fn top_indicators(result: &ClassificationResult) -> Vec<FeatureContribution> {
    let mut ranked: Vec<FeatureContribution> = result
        .contributions
        .iter()
        .copied()
        .filter(|c| c.contribution.abs() > MIN_CONTRIBUTION)
        .collect();

    // Stable: equal magnitudes keep their original (schema) order
    ranked.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
    ranked.truncate(MAX_INDICATORS);
    ranked
}

/// "a", "a and b", "a, b and c"
fn join_phrases(phrases: &[&str]) -> String {
    match phrases {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// Build the explanation for a classification
pub fn explain(result: &ClassificationResult, language: Language) -> String {
    let verdict = match result.label {
        Label::AiGenerated => "AI-generated",
        Label::Human => "human speech",
    };

    let mut text = format!(
        "The {} audio sample appears to be {} (confidence: {:.1}%).",
        language.name(),
        verdict,
        result.confidence * 100.0
    );

    let phrases: Vec<&str> = top_indicators(result)
        .iter()
        .map(|c| phrase(c.feature, c.contribution > 0.0))
        .collect();

    if phrases.is_empty() {
        text.push_str(" No individual characteristic stood out.");
    } else {
        text.push_str(&format!(" Key indicators: {}.", join_phrases(&phrases)));
    }

    if result.confidence < CONFIDENT_THRESHOLD {
        text.push_str(" The result is inconclusive and should not be treated as a strong signal.");
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FeatureVector;
    use crate::classifier::{Classifier, ScorerKind};
    use crate::config::ClassifierConfig;

    fn classify(features: FeatureVector, language: Language) -> ClassificationResult {
        Classifier::from_config(&ClassifierConfig::default()).classify(&features, Some(language))
    }

    fn ai_result() -> ClassificationResult {
        classify(
            FeatureVector {
                pitch_variance: 0.05,
                spectral_flatness: 0.9,
                natural_pauses: false,
                speech_rate: 0.95,
                emotion_variance: 0.1,
                background_noise: 0.02,
            },
            Language::English,
        )
    }

    #[test]
    fn test_ai_explanation() {
        let text = explain(&ai_result(), Language::English);
        assert_eq!(
            text,
            "The English audio sample appears to be AI-generated (confidence: 93.7%). \
             Key indicators: uniform pitch, synthetic spectral texture and limited emotional expression."
        );
    }

    #[test]
    fn test_human_explanation_uses_human_phrasing() {
        let result = classify(
            FeatureVector {
                pitch_variance: 0.6,
                spectral_flatness: 0.2,
                natural_pauses: true,
                speech_rate: 0.4,
                emotion_variance: 0.7,
                background_noise: 0.3,
            },
            Language::Tamil,
        );
        let text = explain(&result, Language::Tamil);

        assert!(text.starts_with("The Tamil audio sample appears to be human speech"));
        // natural_pauses (-0.10) and pitch (-0.10) tie; pitch comes first
        assert!(text.contains(
            "Key indicators: natural spectral content, dynamic emotional expression and natural pitch variation."
        ));
        assert!(!text.contains("inconclusive"));
    }

    #[test]
    fn test_explanation_is_deterministic() {
        let result = ai_result();
        assert_eq!(
            explain(&result, Language::Hindi),
            explain(&result, Language::Hindi)
        );
    }

    #[test]
    fn test_language_name_is_reported() {
        let result = ai_result();
        for language in Language::ALL {
            assert!(explain(&result, language).contains(language.name()));
        }
    }

    #[test]
    fn test_no_standout_characteristic() {
        let result = ClassificationResult::from_parts(
            Label::Human,
            0.5,
            FeatureName::ALL
                .iter()
                .map(|&feature| FeatureContribution {
                    feature,
                    contribution: 0.0,
                })
                .collect(),
            FeatureVector::FLOOR,
            ScorerKind::RuleBased,
        );
        let text = explain(&result, Language::Malayalam);

        assert!(text.contains("No individual characteristic stood out."));
        assert!(text.contains("inconclusive"));
        assert!(text.contains("(confidence: 50.0%)"));
    }

    #[test]
    fn test_single_indicator() {
        let result = ClassificationResult::from_parts(
            Label::AiGenerated,
            0.7,
            vec![
                FeatureContribution {
                    feature: FeatureName::BackgroundNoise,
                    contribution: 0.05,
                },
                FeatureContribution {
                    feature: FeatureName::SpeechRate,
                    contribution: 0.0,
                },
            ],
            FeatureVector::FLOOR,
            ScorerKind::Trained,
        );
        assert!(explain(&result, Language::Telugu)
            .ends_with("Key indicators: unusually clean audio."));
    }

    #[test]
    fn test_join_phrases() {
        assert_eq!(join_phrases(&[]), "");
        assert_eq!(join_phrases(&["a"]), "a");
        assert_eq!(join_phrases(&["a", "b"]), "a and b");
        assert_eq!(join_phrases(&["a", "b", "c"]), "a, b and c");
    }
}
