// Language profiles - reference prosody per supported language
//
// Ranges are coarse population figures used by the heuristic resolver and
// by the classifier's language-conditioned speech-rate pivot.

use super::Language;

/// How often speakers of a language typically pause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseFrequency {
    High,
    Medium,
}

/// Broad language family, used for the spectral centroid cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageFamily {
    Dravidian,
    IndoEuropean,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanguageProfile {
    pub language: Language,
    /// Typical F0 range in Hz
    pub pitch_range_hz: (f32, f32),
    /// Typical normalized speech rate (same scale as FeatureVector::speech_rate)
    pub speech_rate_range: (f32, f32),
    pub pause_frequency: PauseFrequency,
    pub family: LanguageFamily,
}

impl LanguageProfile {
    /// Midpoint of the typical speech-rate range
    pub fn speech_rate_centre(&self) -> f32 {
        (self.speech_rate_range.0 + self.speech_rate_range.1) / 2.0
    }
}

/// Profiles in the fixed language order
pub const PROFILES: [LanguageProfile; 5] = [
    LanguageProfile {
        language: Language::English,
        pitch_range_hz: (85.0, 255.0),
        speech_rate_range: (0.35, 0.55),
        pause_frequency: PauseFrequency::Medium,
        family: LanguageFamily::IndoEuropean,
    },
    LanguageProfile {
        language: Language::Tamil,
        pitch_range_hz: (100.0, 300.0),
        speech_rate_range: (0.40, 0.60),
        pause_frequency: PauseFrequency::High,
        family: LanguageFamily::Dravidian,
    },
    LanguageProfile {
        language: Language::Hindi,
        pitch_range_hz: (90.0, 280.0),
        speech_rate_range: (0.38, 0.58),
        pause_frequency: PauseFrequency::Medium,
        family: LanguageFamily::IndoEuropean,
    },
    LanguageProfile {
        language: Language::Malayalam,
        pitch_range_hz: (95.0, 290.0),
        speech_rate_range: (0.42, 0.62),
        pause_frequency: PauseFrequency::High,
        family: LanguageFamily::Dravidian,
    },
    LanguageProfile {
        language: Language::Telugu,
        pitch_range_hz: (95.0, 285.0),
        speech_rate_range: (0.40, 0.58),
        pause_frequency: PauseFrequency::Medium,
        family: LanguageFamily::Dravidian,
    },
];

pub fn profile(language: Language) -> &'static LanguageProfile {
    match language {
        Language::English => &PROFILES[0],
        Language::Tamil => &PROFILES[1],
        Language::Hindi => &PROFILES[2],
        Language::Malayalam => &PROFILES[3],
        Language::Telugu => &PROFILES[4],
    }
}
