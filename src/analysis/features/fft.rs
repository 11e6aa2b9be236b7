// FFT module - Fast Fourier Transform computation
//
// This module handles windowed power spectra for the spectral features and
// FFT-based autocorrelation for the pitch tracker. Plans are created once at
// construction, so a processor can be shared across threads without locking.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Energy/spectral frame length: 25 ms at 16 kHz
pub const FRAME_LEN: usize = 400;

/// Hop between consecutive frames and pitch windows: 10 ms at 16 kHz
pub const HOP_LEN: usize = 160;

/// Zero-padded FFT size for power spectra
pub const FFT_SIZE: usize = 512;

/// Pitch analysis window: 40 ms at 16 kHz
pub const PITCH_WINDOW_LEN: usize = 640;

/// FFT size for autocorrelation (≥ 2 × PITCH_WINDOW_LEN, no circular wrap)
pub const ACF_FFT_SIZE: usize = 2048;

/// FFT processor for power spectra and autocorrelation
pub struct FftProcessor {
    spectrum_fft: Arc<dyn Fft<f32>>,
    acf_forward: Arc<dyn Fft<f32>>,
    acf_inverse: Arc<dyn Fft<f32>>,
    /// Hann window for spectral frames (pre-computed)
    window: Vec<f32>,
}

impl FftProcessor {
    pub fn new() -> Self {
        // Pre-compute Hann window to reduce spectral leakage
        let window = (0..FRAME_LEN)
            .map(|i| {
                0.5 * (1.0
                    - ((2.0 * std::f32::consts::PI * i as f32) / (FRAME_LEN as f32 - 1.0)).cos())
            })
            .collect();

        let mut planner = FftPlanner::new();
        Self {
            spectrum_fft: planner.plan_fft_forward(FFT_SIZE),
            acf_forward: planner.plan_fft_forward(ACF_FFT_SIZE),
            acf_inverse: planner.plan_fft_inverse(ACF_FFT_SIZE),
            window,
        }
    }

    /// Compute the power spectrum of one frame
    ///
    /// Applies the Hann window, zero-pads to FFT_SIZE and returns |X|² for
    /// positive frequencies only (size = FFT_SIZE / 2 + 1).
    ///
    /// # Arguments
    /// * `frame` - Audio frame (length <= FRAME_LEN; shorter frames are padded)
    pub fn power_spectrum(&self, frame: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = frame
            .iter()
            .zip(&self.window)
            .map(|(&sample, &w)| Complex::new(sample * w, 0.0))
            .collect();
        buffer.resize(FFT_SIZE, Complex::new(0.0, 0.0));

        self.spectrum_fft.process(&mut buffer);

        buffer[..FFT_SIZE / 2 + 1]
            .iter()
            .map(|c| c.norm_sqr())
            .collect()
    }

    /// Raw (biased) autocorrelation r[k] = Σ x[n]·x[n+k] of a mean-removed window
    ///
    /// Computed as IFFT(|FFT(x)|²). Returns lags 0..window.len().
    pub fn autocorrelation(&self, window: &[f32]) -> Vec<f32> {
        let len = window.len().min(ACF_FFT_SIZE / 2);
        if len == 0 {
            return Vec::new();
        }
        let mean = window[..len].iter().sum::<f32>() / len as f32;

        let mut buffer: Vec<Complex<f32>> = window[..len]
            .iter()
            .map(|&s| Complex::new(s - mean, 0.0))
            .collect();
        buffer.resize(ACF_FFT_SIZE, Complex::new(0.0, 0.0));

        self.acf_forward.process(&mut buffer);
        for bin in buffer.iter_mut() {
            *bin = Complex::new(bin.norm_sqr(), 0.0);
        }
        self.acf_inverse.process(&mut buffer);

        // rustfft leaves the inverse unnormalized
        let scale = 1.0 / ACF_FFT_SIZE as f32;
        buffer[..len].iter().map(|c| c.re * scale).collect()
    }
}

impl Default for FftProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_spectrum_size() {
        let fft = FftProcessor::new();
        assert_eq!(fft.power_spectrum(&[0.0; FRAME_LEN]).len(), FFT_SIZE / 2 + 1);
        assert_eq!(fft.power_spectrum(&[0.5; 10]).len(), FFT_SIZE / 2 + 1);
    }

    #[test]
    fn test_autocorrelation_matches_direct_sum() {
        let fft = FftProcessor::new();
        let window: Vec<f32> = (0..64).map(|i| ((i * 7) % 11) as f32 - 5.0).collect();
        let mean = window.iter().sum::<f32>() / window.len() as f32;
        let centered: Vec<f32> = window.iter().map(|s| s - mean).collect();

        let acf = fft.autocorrelation(&window);
        for lag in [0, 1, 5, 20] {
            let direct: f32 = (0..centered.len() - lag)
                .map(|n| centered[n] * centered[n + lag])
                .sum();
            assert!(
                (acf[lag] - direct).abs() < 1e-2,
                "lag {lag}: fft {} vs direct {direct}",
                acf[lag]
            );
        }
    }
}
