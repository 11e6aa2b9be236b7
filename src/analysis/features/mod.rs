// FeatureExtractor - acoustic feature extraction for voice authenticity
//
// This module extracts the fixed six-feature schema used to tell synthetic
// speech from human speech, plus the prosodic statistics the language
// heuristics need. Everything is computed in a single pass over one
// AudioSample at the analysis sample rate.
//
// Module organization:
// - types: Data structures (FeatureVector, FeatureName, ProsodyStats,
//   AuxiliaryDescriptors)
// - fft: Power spectra and autocorrelation with pre-planned FFTs
// - spectral: Frequency-domain features (flatness, centroid)
// - descriptors: MFCCs, spectral shape and envelope statistics for models
// - pitch: F0 estimation by normalized autocorrelation
// - temporal: RMS envelope, segmentation and envelope-derived features
// - mod.rs: Coordinator (FeatureExtractor)
//
// Features extracted:
// 1. Pitch variance: F0 coefficient of variation over voiced windows
// 2. Spectral flatness: Geometric/arithmetic mean of the power spectrum
// 3. Natural pauses: Irregular interior silences above a duration floor
// 4. Speech rate: Voiced segments per second over a reference rate
// 5. Emotion variance: Voiced RMS coefficient of variation
// 6. Background noise: Quietest frames relative to the loudest half
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Boersma, P. (1993). Accurate short-term analysis of the fundamental
//   frequency and the harmonics-to-noise ratio of a sampled sound

mod descriptors;
pub(crate) mod fft;
mod pitch;
mod spectral;
mod temporal;
mod types;

pub use types::{
    Analysis, AuxiliaryDescriptors, FeatureName, FeatureVector, ProsodyStats,
    AUXILIARY_MODEL_INPUTS, MFCC_COUNT,
};

use crate::audio::AudioSample;
use crate::config::FeatureConfig;
use descriptors::DescriptorBank;
use fft::{FftProcessor, FFT_SIZE, FRAME_LEN, HOP_LEN, PITCH_WINDOW_LEN};
use pitch::PitchTracker;
use spectral::SpectralFeatures;
use temporal::EnergyGate;

/// FeatureExtractor coordinates the feature extraction pipeline
///
/// Stateless after construction: FFT plans and configuration are read-only,
/// so one extractor can serve concurrent requests.
pub struct FeatureExtractor {
    fft_processor: FftProcessor,
    config: FeatureConfig,
}

impl FeatureExtractor {
    pub fn new(config: &FeatureConfig) -> Self {
        Self {
            fft_processor: FftProcessor::new(),
            config: config.clone(),
        }
    }

    /// Extract the feature vector from an audio sample
    ///
    /// Pure and deterministic: the same sample always yields a
    /// bit-identical vector. Degenerate input yields floor values.
    pub fn extract(&self, sample: &AudioSample) -> FeatureVector {
        self.analyze(sample).features
    }

    /// Extract features and prosody statistics in one pass
    ///
    /// This method coordinates the entire extraction pipeline:
    /// 1. Frame RMS envelope and hysteresis segmentation
    /// 2. Pauses, speech rate, energy dispersion, noise floor
    /// 3. Per-frame power spectra: flatness and centroid over voiced frames,
    ///    auxiliary descriptors over every frame
    /// 4. Per-window pitch over energy-gated windows
    pub fn analyze(&self, sample: &AudioSample) -> Analysis {
        let samples = sample.samples();
        let sample_rate = sample.sample_rate();
        let duration_secs = sample.duration_secs();
        let cfg = &self.config;

        if samples.is_empty() || sample_rate == 0 {
            return Analysis::default();
        }

        let hop_ms = HOP_LEN as f32 * 1000.0 / sample_rate as f32;

        // Energy envelope and segmentation
        let rms = temporal::frame_rms(samples, FRAME_LEN, HOP_LEN);
        let gate = EnergyGate::from_envelope(
            &rms,
            cfg.energy_on_ratio,
            cfg.hysteresis_ratio,
            cfg.min_voiced_rms,
        );
        let voiced = temporal::segment(&rms, gate);
        let runs = temporal::runs(&voiced);

        let pauses = temporal::interior_pauses_ms(&runs, hop_ms, cfg.min_pause_ms as f32);
        let natural_pauses = temporal::has_natural_pauses(&pauses, cfg.pause_irregularity_cv);

        let segment_rate_hz = temporal::segment_rate_hz(&runs, duration_secs);
        let speech_rate = if cfg.reference_segment_rate_hz > 0.0 {
            (segment_rate_hz / cfg.reference_segment_rate_hz).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let emotion_variance =
            temporal::emotion_variance(&rms, &voiced, cfg.emotion_cv_reference);
        let background_noise = temporal::background_noise(&rms, cfg.noise_floor_fraction);

        // Spectral features over voiced frames, descriptors over all of them
        let spectral = SpectralFeatures::new(sample_rate, FFT_SIZE);
        let bank = DescriptorBank::new(sample_rate, FFT_SIZE);
        let mut descriptors = bank.accumulator();
        let mut flatness_sum = 0.0f32;
        let mut centroid_sum = 0.0f32;
        let mut spectral_frames = 0usize;
        for (i, &is_voiced) in voiced.iter().enumerate() {
            let start = i * HOP_LEN;
            let end = (start + FRAME_LEN).min(samples.len());
            let frame = &samples[start..end];
            let power = self.fft_processor.power_spectrum(frame);
            descriptors.push_frame(frame, &power);
            if is_voiced {
                flatness_sum += spectral.compute_flatness(&power);
                centroid_sum += spectral.compute_centroid(&power);
                spectral_frames += 1;
            }
        }
        let descriptors = descriptors.finish(&rms, duration_secs);
        let (spectral_flatness, spectral_centroid_hz) = if spectral_frames > 0 {
            (
                flatness_sum / spectral_frames as f32,
                centroid_sum / spectral_frames as f32,
            )
        } else {
            (0.0, 0.0)
        };

        // Pitch over energy-gated windows
        let tracker = PitchTracker::new(
            sample_rate,
            cfg.min_f0_hz,
            cfg.max_f0_hz,
            cfg.voicing_threshold,
        );
        let f0: Vec<f32> = pitch_windows(samples.len())
            .filter_map(|start| {
                let window = &samples[start..start + PITCH_WINDOW_LEN];
                if temporal::rms(window) < gate.on {
                    return None;
                }
                tracker.estimate(&self.fft_processor, window)
            })
            .collect();

        let pitch_variance = temporal::coefficient_of_variation(&f0).unwrap_or(0.0);
        let mean_f0_hz = if f0.is_empty() {
            None
        } else {
            Some(f0.iter().sum::<f32>() / f0.len() as f32)
        };

        let features = FeatureVector {
            pitch_variance,
            spectral_flatness,
            natural_pauses,
            speech_rate,
            emotion_variance,
            background_noise,
        }
        .sanitized();

        let prosody = ProsodyStats {
            mean_f0_hz: mean_f0_hz.filter(|f| f.is_finite()),
            spectral_centroid_hz: if spectral_centroid_hz.is_finite() {
                spectral_centroid_hz
            } else {
                0.0
            },
            voiced_frames: voiced.iter().filter(|&&v| v).count(),
            pause_count: pauses.len(),
            segment_rate_hz,
            duration_secs,
        };

        log::debug!(
            "[FeatureExtractor] {:.2}s, {} frames ({} voiced), {} pitched windows, {} pauses: {:?}",
            duration_secs,
            rms.len(),
            prosody.voiced_frames,
            f0.len(),
            pauses.len(),
            features
        );

        Analysis {
            features,
            prosody,
            descriptors,
        }
    }
}

/// Start offsets of full pitch windows
fn pitch_windows(len: usize) -> impl Iterator<Item = usize> {
    let count = if len >= PITCH_WINDOW_LEN {
        1 + (len - PITCH_WINDOW_LEN) / HOP_LEN
    } else {
        0
    };
    (0..count).map(|i| i * HOP_LEN)
}
