// Spectral module - Frequency-domain feature extraction
//
// Features are computed per frame from the power spectrum produced by
// FftProcessor::power_spectrum.
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

/// Power floor applied before taking logarithms
const POWER_FLOOR: f32 = 1e-10;

/// Spectral feature computation functions
pub struct SpectralFeatures {
    sample_rate: u32,
    fft_size: usize,
}

impl SpectralFeatures {
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `fft_size` - FFT size the power spectra were computed with
    pub fn new(sample_rate: u32, fft_size: usize) -> Self {
        Self {
            sample_rate,
            fft_size,
        }
    }

    /// Compute spectral centroid (weighted mean frequency)
    ///
    /// Formula: centroid = Σ(f_i × |X[i]|) / Σ|X[i]|
    ///
    /// Magnitudes are recovered from the power spectrum so the centroid
    /// stays comparable with magnitude-weighted references.
    ///
    /// # Returns
    /// Spectral centroid in Hz, 0.0 for an empty spectrum
    pub fn compute_centroid(&self, power: &[f32]) -> f32 {
        let freq_bin_width = self.sample_rate as f32 / self.fft_size as f32;

        let (weighted_sum, magnitude_sum) =
            power
                .iter()
                .enumerate()
                .fold((0.0f32, 0.0f32), |(weighted, total), (i, &p)| {
                    let mag = p.max(0.0).sqrt();
                    (weighted + i as f32 * freq_bin_width * mag, total + mag)
                });

        if magnitude_sum > 1e-10 {
            weighted_sum / magnitude_sum
        } else {
            0.0
        }
    }

    /// Compute spectral flatness (tonality measure)
    ///
    /// Formula: flatness = exp(mean(ln P)) / mean(P), P floored at 1e-10
    ///
    /// Returns value between 0 (tonal, e.g., sine wave) and 1 (noise-like).
    pub fn compute_flatness(&self, power: &[f32]) -> f32 {
        if power.is_empty() {
            return 0.0;
        }

        let n = power.len() as f32;
        let (log_sum, sum) = power.iter().fold((0.0f64, 0.0f64), |(log_sum, sum), &p| {
            let p = p.max(POWER_FLOOR) as f64;
            (log_sum + p.ln(), sum + p)
        });

        let geometric_mean = (log_sum / n as f64).exp();
        let arithmetic_mean = sum / n as f64;

        if arithmetic_mean > POWER_FLOOR as f64 {
            (geometric_mean / arithmetic_mean).clamp(0.0, 1.0) as f32
        } else {
            0.0
        }
    }
}
