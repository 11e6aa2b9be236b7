//! Configuration management for the detection pipeline
//!
//! This module provides runtime configuration loading from JSON files so
//! ingestion limits, extraction thresholds, language resolution policy and
//! classifier calibration can be adjusted without recompilation. Every field
//! has a default, so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::audio::AudioFormat;
use crate::classifier::FeatureWeights;
use crate::language::Language;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ingestion: IngestionConfig,
    pub features: FeatureConfig,
    pub language: LanguageConfig,
    pub classifier: ClassifierConfig,
}

/// Audio ingestion limits and allow-list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Maximum encoded payload size in bytes (inclusive)
    pub max_encoded_bytes: usize,
    /// Maximum decoded PCM size in bytes (f32, interleaved, native rate)
    pub max_decoded_bytes: usize,
    /// Containers accepted by the ingestor
    pub allowed_formats: Vec<AudioFormat>,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_encoded_bytes: 10 * 1024 * 1024,
            max_decoded_bytes: 256 * 1024 * 1024,
            allowed_formats: AudioFormat::ALL.to_vec(),
        }
    }
}

/// Feature extraction thresholds
///
/// Framing (25 ms frames, 10 ms hop, 40 ms pitch window at 16 kHz) is fixed
/// in `analysis::features` and intentionally not configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Lowest F0 searched by the pitch tracker (Hz)
    pub min_f0_hz: f32,
    /// Highest F0 searched by the pitch tracker (Hz)
    pub max_f0_hz: f32,
    /// Minimum normalized autocorrelation peak for a voiced frame
    pub voicing_threshold: f32,
    /// Voiced-entry threshold as a fraction of the mean frame RMS
    pub energy_on_ratio: f32,
    /// Voiced-exit threshold as a fraction of the entry threshold
    pub hysteresis_ratio: f32,
    /// Absolute RMS floor below which a frame is always silent
    pub min_voiced_rms: f32,
    /// Shortest interior silence counted as a pause (ms)
    pub min_pause_ms: u32,
    /// Minimum coefficient of variation of pause durations for "natural" pauses
    pub pause_irregularity_cv: f32,
    /// Voiced segments per second that map to a speech rate of 1.0
    pub reference_segment_rate_hz: f32,
    /// RMS coefficient of variation that maps to an emotion variance of 1.0
    pub emotion_cv_reference: f32,
    /// Fraction of quietest frames averaged into the noise floor
    pub noise_floor_fraction: f32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            min_f0_hz: 60.0,
            max_f0_hz: 400.0,
            voicing_threshold: 0.45,
            energy_on_ratio: 0.3,
            hysteresis_ratio: 0.6,
            min_voiced_rms: 1e-3,
            min_pause_ms: 120,
            pause_irregularity_cv: 0.2,
            reference_segment_rate_hz: 4.0,
            emotion_cv_reference: 1.0,
            noise_floor_fraction: 0.1,
        }
    }
}

/// Language resolution policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Language reported when neither recognition nor heuristics resolve one
    pub default_language: Language,
    /// Minimum transcript confidence x script share to accept a recognition result
    pub recognition_confidence_threshold: f32,
    /// Minimum normalized heuristic score to accept a heuristic result
    pub heuristic_min_confidence: f32,
    /// Minimum voiced frames before prosodic heuristics are attempted
    pub min_voiced_frames: usize,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            default_language: Language::English,
            recognition_confidence_threshold: 0.6,
            heuristic_min_confidence: 0.2,
            min_voiced_frames: 10,
        }
    }
}

/// Authenticity classifier calibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Rule-based weight per feature (magnitudes; direction is fixed per feature)
    pub weights: FeatureWeights,
    /// Neutral value of every scalar feature
    pub pivot: f32,
    /// Distance from the pivot at which an indicator saturates
    pub span: f32,
    /// Logistic steepness applied to the raw score
    pub steepness: f32,
    /// Centre the speech-rate pivot on the resolved language's typical rate
    pub condition_on_language: bool,
    /// Optional trained-model artifact (JSON logistic regression)
    pub model_path: Option<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            weights: FeatureWeights::default(),
            pivot: 0.5,
            span: 0.25,
            steepness: 3.0,
            condition_on_language: true,
            model_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration, or defaults if the file is missing or invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load_from_file(&path) {
            Ok(config) => {
                log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                config
            }
            Err(err) => {
                log::warn!(
                    "[Config] Failed to load {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from JSON file, reporting failures to the caller
    pub fn try_load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(&path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }
}
