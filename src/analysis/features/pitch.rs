// Pitch module - F0 estimation by normalized autocorrelation
//
// Each pitch window is mean-removed and autocorrelated via FFT. The
// unbiased normalized autocorrelation nacf[k] = (r[k] / (N - k)) / (r[0] / N)
// is searched over the lag range implied by the F0 search range. The
// smallest-lag local maximum reaching OCTAVE_GUARD × the best peak is taken
// (avoids picking a sub-harmonic) and refined by parabolic interpolation.

use super::fft::FftProcessor;

/// A candidate peak must reach this fraction of the best peak
const OCTAVE_GUARD: f32 = 0.85;

/// Autocorrelation pitch tracker for one sample rate and F0 range
pub struct PitchTracker {
    sample_rate: u32,
    min_lag: usize,
    max_lag: usize,
    voicing_threshold: f32,
}

impl PitchTracker {
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `min_f0_hz` / `max_f0_hz` - F0 search range
    /// * `voicing_threshold` - Minimum normalized autocorrelation peak
    pub fn new(sample_rate: u32, min_f0_hz: f32, max_f0_hz: f32, voicing_threshold: f32) -> Self {
        let rate = sample_rate as f32;
        let min_lag = (rate / max_f0_hz.max(1.0)).floor().max(2.0) as usize;
        let max_lag = (rate / min_f0_hz.max(1.0)).ceil() as usize;
        Self {
            sample_rate,
            min_lag,
            max_lag: max_lag.max(min_lag + 1),
            voicing_threshold,
        }
    }

    /// Estimate F0 for one window
    ///
    /// # Returns
    /// F0 in Hz, or None when the window is unvoiced or too short for the
    /// lag range
    pub fn estimate(&self, fft: &FftProcessor, window: &[f32]) -> Option<f32> {
        let r = fft.autocorrelation(window);
        let n = r.len();
        if n < 3 || r[0] <= 1e-12 {
            return None;
        }

        let max_lag = self.max_lag.min(n - 2);
        if max_lag <= self.min_lag {
            return None;
        }

        let energy = r[0] / n as f32;
        let nacf: Vec<f32> = (0..=max_lag + 1)
            .map(|k| (r[k] / (n - k) as f32) / energy)
            .collect();

        let (best_lag, best) = (self.min_lag..=max_lag)
            .map(|k| (k, nacf[k]))
            .fold((self.min_lag, f32::MIN), |acc, (k, v)| {
                if v > acc.1 {
                    (k, v)
                } else {
                    acc
                }
            });

        if !best.is_finite() || best < self.voicing_threshold {
            return None;
        }

        let lag = (self.min_lag..=max_lag)
            .find(|&k| {
                nacf[k] >= OCTAVE_GUARD * best && nacf[k] >= nacf[k - 1] && nacf[k] >= nacf[k + 1]
            })
            .unwrap_or(best_lag);

        let refined = lag as f32 + parabolic_offset(nacf[lag - 1], nacf[lag], nacf[lag + 1]);
        if refined <= 0.0 {
            return None;
        }

        let f0 = self.sample_rate as f32 / refined;
        f0.is_finite().then_some(f0)
    }
}

/// Vertex offset of the parabola through three equally spaced points, in [-0.5, 0.5]
fn parabolic_offset(left: f32, centre: f32, right: f32) -> f32 {
    let denom = left - 2.0 * centre + right;
    if denom.abs() < 1e-12 {
        return 0.0;
    }
    (0.5 * (left - right) / denom).clamp(-0.5, 0.5)
}
