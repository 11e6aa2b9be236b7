// Descriptors module - auxiliary spectral and temporal descriptors
//
// MFCCs, spectral shape (centroid, bandwidth, rolloff, contrast), zero
// crossings and envelope statistics, averaged over every analysis frame.
// Frames arrive one at a time with their power spectrum so the extractor's
// single pass over the sample can feed both the feature schema and these.
//
// References:
// - Davis, S. & Mermelstein, P. (1980). Comparison of parametric
//   representations for monosyllabic word recognition
// - Jiang, D.-N. et al. (2002). Music type classification by spectral contrast

use std::f32::consts::PI;

use super::types::{AuxiliaryDescriptors, MFCC_COUNT};

const MEL_BANDS: usize = 40;

/// Share of total magnitude below the rolloff frequency
const ROLLOFF_FRACTION: f32 = 0.85;

/// Upper edge of the lowest contrast band; each further band spans one octave
const CONTRAST_FMIN_HZ: f32 = 200.0;
const CONTRAST_OCTAVES: usize = 6;

/// Fraction of a band's bins averaged for its peak and its valley
const CONTRAST_QUANTILE: f32 = 0.02;

/// Power floor applied before taking logarithms
const POWER_FLOOR: f32 = 1e-10;

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0f32.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filters over `fft_size / 2 + 1` bins, 0 Hz to Nyquist
fn mel_filter_bank(num_mels: usize, fft_size: usize, sample_rate: u32) -> Vec<Vec<f32>> {
    let half_fft = fft_size / 2 + 1;
    let high_mel = hz_to_mel(sample_rate as f32 / 2.0);
    let step = high_mel / (num_mels + 1) as f32;

    let mut bins: Vec<usize> = (0..num_mels + 2)
        .map(|i| {
            let hz = mel_to_hz(i as f32 * step);
            let bin = (hz * fft_size as f32 / sample_rate as f32).round() as usize;
            bin.min(half_fft - 1)
        })
        .collect();

    // Every filter spans at least one bin
    for i in 1..bins.len() {
        if bins[i] <= bins[i - 1] {
            bins[i] = bins[i - 1] + 1;
        }
    }

    (0..num_mels)
        .map(|m| {
            let (left, center, right) = (bins[m], bins[m + 1], bins[m + 2]);
            let mut filter = vec![0.0f32; half_fft];
            for k in left..center.min(half_fft) {
                filter[k] = (k - left) as f32 / (center - left) as f32;
            }
            for k in center..=right.min(half_fft - 1) {
                filter[k] = (right - k) as f32 / (right - center) as f32;
            }
            filter
        })
        .collect()
}

/// Orthonormal DCT-II basis, `MFCC_COUNT` rows of `MEL_BANDS` columns
fn dct_basis() -> Vec<[f32; MEL_BANDS]> {
    let m = MEL_BANDS as f32;
    (0..MFCC_COUNT)
        .map(|n| {
            let norm = if n == 0 { (1.0 / m).sqrt() } else { (2.0 / m).sqrt() };
            let mut row = [0.0f32; MEL_BANDS];
            for (j, value) in row.iter_mut().enumerate() {
                *value = norm * (PI * n as f32 * (j as f32 + 0.5) / m).cos();
            }
            row
        })
        .collect()
}

/// Filters and band layouts for one sample rate and FFT size
pub struct DescriptorBank {
    mel: Vec<Vec<f32>>,
    dct: Vec<[f32; MEL_BANDS]>,
    /// Half-open bin ranges of the contrast sub-bands
    contrast_bands: Vec<(usize, usize)>,
    bin_hz: f32,
}

impl DescriptorBank {
    pub fn new(sample_rate: u32, fft_size: usize) -> Self {
        let half_fft = fft_size / 2 + 1;
        let bin_hz = sample_rate as f32 / fft_size as f32;
        let nyquist = sample_rate as f32 / 2.0;

        let mut edges = vec![0.0f32];
        edges.extend((0..=CONTRAST_OCTAVES).map(|i| CONTRAST_FMIN_HZ * 2f32.powi(i as i32)));
        let contrast_bands = edges
            .windows(2)
            .filter(|edge| edge[0] < nyquist)
            .map(|edge| {
                let lo = (edge[0] / bin_hz).floor() as usize;
                let hi = ((edge[1].min(nyquist) / bin_hz).ceil() as usize + 1).min(half_fft);
                (lo.min(half_fft), hi)
            })
            .filter(|(lo, hi)| hi > lo)
            .collect();

        Self {
            mel: mel_filter_bank(MEL_BANDS, fft_size, sample_rate),
            dct: dct_basis(),
            contrast_bands,
            bin_hz,
        }
    }

    pub fn accumulator(&self) -> DescriptorAccumulator<'_> {
        DescriptorAccumulator {
            bank: self,
            frames: 0,
            mfcc_sums: [0.0; MFCC_COUNT],
            centroid_sum: 0.0,
            bandwidth_sum: 0.0,
            rolloff_sum: 0.0,
            contrast_sum: 0.0,
            zcr_sum: 0.0,
        }
    }

    /// 13 cepstral coefficients of one power spectrum
    fn mfcc(&self, power: &[f32]) -> [f32; MFCC_COUNT] {
        let mut log_mel = [0.0f32; MEL_BANDS];
        for (energy, filter) in log_mel.iter_mut().zip(&self.mel) {
            let e: f32 = filter.iter().zip(power).map(|(w, p)| w * p).sum();
            *energy = 10.0 * e.max(POWER_FLOOR).log10();
        }

        let mut coefficients = [0.0f32; MFCC_COUNT];
        for (c, row) in coefficients.iter_mut().zip(&self.dct) {
            *c = row.iter().zip(&log_mel).map(|(b, e)| b * e).sum();
        }
        coefficients
    }

    /// Centroid, bandwidth and rolloff in Hz from magnitudes
    fn shape(&self, magnitude: &[f32]) -> (f32, f32, f32) {
        let total: f32 = magnitude.iter().sum();
        if total <= POWER_FLOOR {
            return (0.0, 0.0, 0.0);
        }

        let centroid = magnitude
            .iter()
            .enumerate()
            .map(|(k, m)| k as f32 * self.bin_hz * m)
            .sum::<f32>()
            / total;

        let spread = magnitude
            .iter()
            .enumerate()
            .map(|(k, m)| {
                let d = k as f32 * self.bin_hz - centroid;
                m * d * d
            })
            .sum::<f32>()
            / total;

        let threshold = ROLLOFF_FRACTION * total;
        let mut cumulative = 0.0f32;
        let mut rolloff_bin = magnitude.len().saturating_sub(1);
        for (k, m) in magnitude.iter().enumerate() {
            cumulative += m;
            if cumulative >= threshold {
                rolloff_bin = k;
                break;
            }
        }

        (centroid, spread.max(0.0).sqrt(), rolloff_bin as f32 * self.bin_hz)
    }

    /// Mean peak-to-valley ratio over the sub-bands, in dB
    fn contrast(&self, magnitude: &[f32]) -> f32 {
        if self.contrast_bands.is_empty() {
            return 0.0;
        }

        let mut sum = 0.0f32;
        for &(lo, hi) in &self.contrast_bands {
            let hi = hi.min(magnitude.len());
            if lo >= hi {
                continue;
            }
            let mut band = magnitude[lo..hi].to_vec();
            band.sort_by(|a, b| a.total_cmp(b));
            let take = ((CONTRAST_QUANTILE * band.len() as f32).round() as usize).max(1);
            let valley = band[..take].iter().sum::<f32>() / take as f32;
            let peak = band[band.len() - take..].iter().sum::<f32>() / take as f32;
            sum += 10.0 * (peak.max(POWER_FLOOR).log10() - valley.max(POWER_FLOOR).log10());
        }
        sum / self.contrast_bands.len() as f32
    }
}

/// Running sums over the frames of one sample
pub struct DescriptorAccumulator<'a> {
    bank: &'a DescriptorBank,
    frames: usize,
    mfcc_sums: [f32; MFCC_COUNT],
    centroid_sum: f32,
    bandwidth_sum: f32,
    rolloff_sum: f32,
    contrast_sum: f32,
    zcr_sum: f32,
}

impl DescriptorAccumulator<'_> {
    /// Add one frame and its power spectrum
    pub fn push_frame(&mut self, frame: &[f32], power: &[f32]) {
        let magnitude: Vec<f32> = power.iter().map(|p| p.max(0.0).sqrt()).collect();

        for (sum, c) in self.mfcc_sums.iter_mut().zip(self.bank.mfcc(power)) {
            *sum += c;
        }
        let (centroid, bandwidth, rolloff) = self.bank.shape(&magnitude);
        self.centroid_sum += centroid;
        self.bandwidth_sum += bandwidth;
        self.rolloff_sum += rolloff;
        self.contrast_sum += self.bank.contrast(&magnitude);
        self.zcr_sum += zero_crossing_rate(frame);
        self.frames += 1;
    }

    /// Per-frame means, plus statistics of the frame RMS envelope
    pub fn finish(self, rms: &[f32], duration_secs: f32) -> AuxiliaryDescriptors {
        let (rms_mean, rms_std) = mean_and_std(rms);
        if self.frames == 0 {
            return AuxiliaryDescriptors {
                rms_mean,
                rms_std,
                duration_secs,
                ..AuxiliaryDescriptors::default()
            };
        }

        let n = self.frames as f32;
        AuxiliaryDescriptors {
            mfcc_means: self.mfcc_sums.map(|sum| sum / n),
            spectral_centroid_hz: self.centroid_sum / n,
            spectral_bandwidth_hz: self.bandwidth_sum / n,
            spectral_rolloff_hz: self.rolloff_sum / n,
            spectral_contrast_db: self.contrast_sum / n,
            zero_crossing_rate: self.zcr_sum / n,
            rms_mean,
            rms_std,
            duration_secs,
        }
        .sanitized()
    }
}

fn zero_crossing_rate(frame: &[f32]) -> f32 {
    if frame.len() < 2 {
        return 0.0;
    }
    let crossings = frame
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();
    crossings as f32 / frame.len() as f32
}

/// Population mean and standard deviation
fn mean_and_std(values: &[f32]) -> (f32, f32) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n;
    (mean, variance.max(0.0).sqrt())
}
