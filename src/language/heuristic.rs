// Heuristic language inference from prosodic cues
//
// Each language accumulates points for a speech rate in (or near) its
// typical range, an F0 inside its pitch range, a matching pause profile,
// and the spectral centroid family. Scores are compared in the fixed
// language order so ties always resolve the same way.

use super::profiles::{LanguageFamily, PauseFrequency, PROFILES};
use super::Language;
use crate::analysis::{FeatureVector, ProsodyStats};

const RATE_IN_RANGE: f32 = 0.3;
const RATE_NEAR_CENTRE: f32 = 0.15;
/// Distance from the range centre that still earns RATE_NEAR_CENTRE
const RATE_NEAR_DISTANCE: f32 = 0.15;
const PITCH_IN_RANGE: f32 = 0.2;
const PAUSE_HIGH_MATCH: f32 = 0.2;
const PAUSE_MEDIUM: f32 = 0.15;
const CENTROID_FAMILY: f32 = 0.1;
/// Dravidian languages tend to a brighter spectrum above this centroid
const CENTROID_SPLIT_HZ: f32 = 2000.0;

/// Highest score any language can reach
pub const MAX_SCORE: f32 = RATE_IN_RANGE + PITCH_IN_RANGE + PAUSE_HIGH_MATCH + CENTROID_FAMILY;

/// Heuristic confidence never exceeds this
pub const CONFIDENCE_CAP: f32 = 0.6;

/// Per-language scores in the fixed language order
pub fn score(features: &FeatureVector, prosody: &ProsodyStats) -> [(Language, f32); 5] {
    let rate = features.speech_rate;
    let has_pauses = features.natural_pauses;
    let centroid = prosody.spectral_centroid_hz;

    PROFILES.map(|profile| {
        let mut score = 0.0;

        let (lo, hi) = profile.speech_rate_range;
        if (lo..=hi).contains(&rate) {
            score += RATE_IN_RANGE;
        } else if (rate - profile.speech_rate_centre()).abs() < RATE_NEAR_DISTANCE {
            score += RATE_NEAR_CENTRE;
        }

        if let Some(f0) = prosody.mean_f0_hz {
            let (lo, hi) = profile.pitch_range_hz;
            if (lo..=hi).contains(&f0) {
                score += PITCH_IN_RANGE;
            }
        }

        match profile.pause_frequency {
            PauseFrequency::High if has_pauses => score += PAUSE_HIGH_MATCH,
            PauseFrequency::High => {}
            PauseFrequency::Medium => score += PAUSE_MEDIUM,
        }

        if centroid > 0.0 {
            let bright = centroid > CENTROID_SPLIT_HZ;
            let matches = match profile.family {
                LanguageFamily::Dravidian => bright,
                LanguageFamily::IndoEuropean => !bright,
            };
            if matches {
                score += CENTROID_FAMILY;
            }
        }

        (profile.language, score)
    })
}

/// Best-scoring language and its normalized, capped confidence
pub fn infer(features: &FeatureVector, prosody: &ProsodyStats) -> (Language, f32) {
    let scores = score(features, prosody);
    let (language, best) = scores
        .iter()
        .copied()
        .fold(scores[0], |acc, candidate| {
            if candidate.1 > acc.1 {
                candidate
            } else {
                acc
            }
        });

    let confidence = (best / MAX_SCORE).clamp(0.0, CONFIDENCE_CAP);
    (language, confidence)
}
