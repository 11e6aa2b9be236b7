// Types module - Data structures for voice features
//
// This module defines the fixed-schema feature vector consumed by the
// classifier and the prosody statistics consumed by language heuristics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Names of the six features, in schema order
///
/// Schema order is the tie-break order wherever features are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    PitchVariance,
    SpectralFlatness,
    NaturalPauses,
    SpeechRate,
    EmotionVariance,
    BackgroundNoise,
}

impl FeatureName {
    pub const ALL: [FeatureName; 6] = [
        FeatureName::PitchVariance,
        FeatureName::SpectralFlatness,
        FeatureName::NaturalPauses,
        FeatureName::SpeechRate,
        FeatureName::EmotionVariance,
        FeatureName::BackgroundNoise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureName::PitchVariance => "pitch_variance",
            FeatureName::SpectralFlatness => "spectral_flatness",
            FeatureName::NaturalPauses => "natural_pauses",
            FeatureName::SpeechRate => "speech_rate",
            FeatureName::EmotionVariance => "emotion_variance",
            FeatureName::BackgroundNoise => "background_noise",
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acoustic characteristics of one recording
///
/// All six fields are always present and finite. Computations that are
/// undefined for the input (silence, too few voiced frames) report the
/// floor value: 0.0, or `false` for `natural_pauses`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Coefficient of variation of F0 over voiced frames (0.0 to 1.0)
    ///
    /// Values above 1.0 only arise from octave errors and are clamped.
    pub pitch_variance: f32,

    /// Geometric/arithmetic mean ratio of the power spectrum (0.0 to 1.0)
    ///
    /// 0.0 = pure tone, 1.0 = white noise
    pub spectral_flatness: f32,

    /// Irregular silence gaps above the pause duration floor
    pub natural_pauses: bool,

    /// Voiced-segment rate normalized by a reference rate (0.0 to 1.0)
    pub speech_rate: f32,

    /// Normalized dispersion of the voiced RMS envelope (0.0 to 1.0)
    pub emotion_variance: f32,

    /// Noise floor relative to speech level (0.0 to 1.0)
    pub background_noise: f32,
}

impl FeatureVector {
    /// Vector with every feature at its floor value
    pub const FLOOR: FeatureVector = FeatureVector {
        pitch_variance: 0.0,
        spectral_flatness: 0.0,
        natural_pauses: false,
        speech_rate: 0.0,
        emotion_variance: 0.0,
        background_noise: 0.0,
    };

    /// Numeric value of a feature; `natural_pauses` maps to 1.0 / 0.0
    pub fn value(&self, name: FeatureName) -> f32 {
        match name {
            FeatureName::PitchVariance => self.pitch_variance,
            FeatureName::SpectralFlatness => self.spectral_flatness,
            FeatureName::NaturalPauses => {
                if self.natural_pauses {
                    1.0
                } else {
                    0.0
                }
            }
            FeatureName::SpeechRate => self.speech_rate,
            FeatureName::EmotionVariance => self.emotion_variance,
            FeatureName::BackgroundNoise => self.background_noise,
        }
    }

    /// Numeric values in schema order
    pub fn as_array(&self) -> [f32; 6] {
        FeatureName::ALL.map(|name| self.value(name))
    }

    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }

    /// Replace non-finite values with the floor and clamp to each feature's range
    pub fn sanitized(self) -> Self {
        fn unit(v: f32) -> f32 {
            if v.is_finite() {
                v.clamp(0.0, 1.0)
            } else {
                0.0
            }
        }

        Self {
            pitch_variance: unit(self.pitch_variance),
            spectral_flatness: unit(self.spectral_flatness),
            natural_pauses: self.natural_pauses,
            speech_rate: unit(self.speech_rate),
            emotion_variance: unit(self.emotion_variance),
            background_noise: unit(self.background_noise),
        }
    }
}

/// Prosodic statistics gathered alongside the feature vector
///
/// Only the language heuristics read these; they are not part of the
/// detection report.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ProsodyStats {
    /// Mean F0 over pitch-voiced windows, if any were voiced
    pub mean_f0_hz: Option<f32>,

    /// Mean magnitude-weighted spectral centroid over voiced frames
    pub spectral_centroid_hz: f32,

    /// Frames above the energy gate
    pub voiced_frames: usize,

    /// Interior silences at least as long as the pause floor
    pub pause_count: usize,

    /// Voiced segments per second
    pub segment_rate_hz: f32,

    pub duration_secs: f32,
}

/// Number of cepstral coefficients kept per frame
pub const MFCC_COUNT: usize = 13;

/// Length of `AuxiliaryDescriptors::model_inputs`
pub const AUXILIARY_MODEL_INPUTS: usize = MFCC_COUNT + 4;

/// Spectral and temporal descriptors outside the six-feature schema
///
/// Only trained models that declare auxiliary weights read these. Means and
/// deviations are taken over every analysis frame, silent frames included.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AuxiliaryDescriptors {
    /// Per-coefficient mean of 13 MFCCs (40 mel bands, dB power, orthonormal DCT-II)
    pub mfcc_means: [f32; MFCC_COUNT],

    /// Magnitude-weighted mean frequency
    pub spectral_centroid_hz: f32,

    /// Magnitude-weighted standard deviation around the centroid
    pub spectral_bandwidth_hz: f32,

    /// Frequency below which 85% of the spectral magnitude lies
    pub spectral_rolloff_hz: f32,

    /// Mean peak-to-valley ratio over octave sub-bands
    pub spectral_contrast_db: f32,

    /// Fraction of adjacent sample pairs that change sign
    pub zero_crossing_rate: f32,

    pub rms_mean: f32,
    pub rms_std: f32,
    pub duration_secs: f32,
}

impl AuxiliaryDescriptors {
    /// Inputs consumed by a model's auxiliary weights, in artifact order
    ///
    /// The 13 MFCC means, then centroid / 10 kHz, bandwidth / 5 kHz,
    /// rolloff / 20 kHz and contrast / 100 dB.
    pub fn model_inputs(&self) -> [f32; AUXILIARY_MODEL_INPUTS] {
        let mut inputs = [0.0; AUXILIARY_MODEL_INPUTS];
        inputs[..MFCC_COUNT].copy_from_slice(&self.mfcc_means);
        inputs[MFCC_COUNT] = self.spectral_centroid_hz / 10_000.0;
        inputs[MFCC_COUNT + 1] = self.spectral_bandwidth_hz / 5_000.0;
        inputs[MFCC_COUNT + 2] = self.spectral_rolloff_hz / 20_000.0;
        inputs[MFCC_COUNT + 3] = self.spectral_contrast_db / 100.0;
        inputs
    }

    pub fn is_finite(&self) -> bool {
        self.mfcc_means.iter().all(|v| v.is_finite())
            && [
                self.spectral_centroid_hz,
                self.spectral_bandwidth_hz,
                self.spectral_rolloff_hz,
                self.spectral_contrast_db,
                self.zero_crossing_rate,
                self.rms_mean,
                self.rms_std,
                self.duration_secs,
            ]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Replace non-finite values with 0.0
    pub fn sanitized(self) -> Self {
        fn finite(v: f32) -> f32 {
            if v.is_finite() {
                v
            } else {
                0.0
            }
        }

        Self {
            mfcc_means: self.mfcc_means.map(finite),
            spectral_centroid_hz: finite(self.spectral_centroid_hz),
            spectral_bandwidth_hz: finite(self.spectral_bandwidth_hz),
            spectral_rolloff_hz: finite(self.spectral_rolloff_hz),
            spectral_contrast_db: finite(self.spectral_contrast_db),
            zero_crossing_rate: finite(self.zero_crossing_rate),
            rms_mean: finite(self.rms_mean),
            rms_std: finite(self.rms_std),
            duration_secs: finite(self.duration_secs),
        }
    }
}

/// Everything a single extraction pass produces
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Analysis {
    pub features: FeatureVector,
    pub prosody: ProsodyStats,
    pub descriptors: AuxiliaryDescriptors,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_is_finite() {
        assert!(FeatureVector::FLOOR.is_finite());
        assert_eq!(FeatureVector::FLOOR, FeatureVector::default());
    }

    #[test]
    fn test_sanitized_replaces_non_finite() {
        let v = FeatureVector {
            pitch_variance: f32::NAN,
            spectral_flatness: f32::INFINITY,
            natural_pauses: true,
            speech_rate: 1.7,
            emotion_variance: -0.2,
            background_noise: 0.3,
        }
        .sanitized();

        assert_eq!(v.pitch_variance, 0.0);
        assert_eq!(v.spectral_flatness, 0.0);
        assert!(v.natural_pauses);
        assert_eq!(v.speech_rate, 1.0);
        assert_eq!(v.emotion_variance, 0.0);
        assert_eq!(v.background_noise, 0.3);
    }

    #[test]
    fn test_sanitized_keeps_every_scalar_in_unit_range() {
        let v = FeatureVector {
            pitch_variance: 2.4,
            spectral_flatness: 1.2,
            natural_pauses: false,
            speech_rate: 3.0,
            emotion_variance: 1.5,
            background_noise: 9.0,
        }
        .sanitized();

        assert_eq!(v.pitch_variance, 1.0);
        for value in v.as_array() {
            assert!((0.0..=1.0).contains(&value), "{value} out of range");
        }
    }

    #[test]
    fn test_serialized_field_names_match_schema() {
        let json = serde_json::to_value(FeatureVector::FLOOR).unwrap();
        for name in FeatureName::ALL {
            assert!(json.get(name.as_str()).is_some(), "missing {}", name);
        }
        assert_eq!(json["natural_pauses"], serde_json::json!(false));
    }

    #[test]
    fn test_auxiliary_model_inputs_are_scaled() {
        let mut descriptors = AuxiliaryDescriptors {
            spectral_centroid_hz: 2_000.0,
            spectral_bandwidth_hz: 1_000.0,
            spectral_rolloff_hz: 4_000.0,
            spectral_contrast_db: 20.0,
            ..AuxiliaryDescriptors::default()
        };
        descriptors.mfcc_means[0] = -300.0;
        descriptors.mfcc_means[12] = 1.5;

        let inputs = descriptors.model_inputs();
        assert_eq!(inputs[0], -300.0);
        assert_eq!(inputs[12], 1.5);
        assert_eq!(&inputs[13..], &[0.2, 0.2, 0.2, 0.2]);
    }

    #[test]
    fn test_auxiliary_sanitized_clears_non_finite() {
        let mut descriptors = AuxiliaryDescriptors {
            spectral_rolloff_hz: f32::NAN,
            rms_std: f32::INFINITY,
            ..AuxiliaryDescriptors::default()
        };
        descriptors.mfcc_means[3] = f32::NEG_INFINITY;
        assert!(!descriptors.is_finite());

        let clean = descriptors.sanitized();
        assert!(clean.is_finite());
        assert_eq!(clean.mfcc_means[3], 0.0);
        assert_eq!(clean.spectral_rolloff_hz, 0.0);
    }
}
