// Temporal module - Time-domain feature extraction
//
// This module computes the RMS envelope, voiced/silent segmentation with
// hysteresis, and the features derived from them: pause irregularity,
// speech rate, energy dispersion and noise floor.

/// Voiced/silent run of consecutive frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub voiced: bool,
    pub start: usize,
    pub len: usize,
}

/// Hysteresis thresholds for the energy gate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyGate {
    /// Enter voiced at or above this RMS
    pub on: f32,
    /// Leave voiced below this RMS
    pub off: f32,
}

impl EnergyGate {
    /// Derive the gate from the envelope's mean level
    pub fn from_envelope(rms: &[f32], on_ratio: f32, hysteresis_ratio: f32, min_on: f32) -> Self {
        let mean = if rms.is_empty() {
            0.0
        } else {
            rms.iter().sum::<f32>() / rms.len() as f32
        };
        let on = (on_ratio * mean).max(min_on);
        Self {
            on,
            off: on * hysteresis_ratio,
        }
    }
}

/// RMS of each frame; a signal shorter than one frame yields a single frame
pub fn frame_rms(samples: &[f32], frame_len: usize, hop: usize) -> Vec<f32> {
    if samples.is_empty() || frame_len == 0 || hop == 0 {
        return Vec::new();
    }
    if samples.len() < frame_len {
        return vec![rms(samples)];
    }

    let count = 1 + (samples.len() - frame_len) / hop;
    (0..count)
        .map(|i| rms(&samples[i * hop..i * hop + frame_len]))
        .collect()
}

pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

/// Per-frame voiced flags with hysteresis
pub fn segment(rms: &[f32], gate: EnergyGate) -> Vec<bool> {
    let mut voiced = false;
    rms.iter()
        .map(|&level| {
            if voiced {
                if level < gate.off {
                    voiced = false;
                }
            } else if level >= gate.on {
                voiced = true;
            }
            voiced
        })
        .collect()
}

/// Collapse voiced flags into runs
pub fn runs(flags: &[bool]) -> Vec<Run> {
    let mut out: Vec<Run> = Vec::new();
    for (i, &voiced) in flags.iter().enumerate() {
        match out.last_mut() {
            Some(run) if run.voiced == voiced => run.len += 1,
            _ => out.push(Run {
                voiced,
                start: i,
                len: 1,
            }),
        }
    }
    out
}

/// Durations (ms) of silent runs bounded by voiced runs on both sides
/// that last at least `min_pause_ms`
pub fn interior_pauses_ms(runs: &[Run], hop_ms: f32, min_pause_ms: f32) -> Vec<f32> {
    if runs.len() < 3 {
        return Vec::new();
    }
    runs[1..runs.len() - 1]
        .iter()
        .filter(|run| !run.voiced)
        .map(|run| run.len as f32 * hop_ms)
        .filter(|&ms| ms >= min_pause_ms)
        .collect()
}

/// At least two pauses whose durations vary by at least `min_cv`
pub fn has_natural_pauses(pauses_ms: &[f32], min_cv: f32) -> bool {
    pauses_ms.len() >= 2 && coefficient_of_variation(pauses_ms).is_some_and(|cv| cv >= min_cv)
}

/// Voiced segments per second
pub fn segment_rate_hz(runs: &[Run], duration_secs: f32) -> f32 {
    if duration_secs <= 0.0 {
        return 0.0;
    }
    runs.iter().filter(|run| run.voiced).count() as f32 / duration_secs
}

/// Coefficient of variation of voiced-frame RMS, normalized by `reference_cv`
pub fn emotion_variance(rms: &[f32], voiced: &[bool], reference_cv: f32) -> f32 {
    let levels: Vec<f32> = rms
        .iter()
        .zip(voiced)
        .filter(|(_, &v)| v)
        .map(|(&level, _)| level)
        .collect();

    match coefficient_of_variation(&levels) {
        Some(cv) if reference_cv > 0.0 => (cv / reference_cv).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Mean of the quietest `fraction` of frames over the mean of the loudest half
pub fn background_noise(rms: &[f32], fraction: f32) -> f32 {
    if rms.is_empty() {
        return 0.0;
    }
    let mut sorted = rms.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let quiet_count = ((n as f32 * fraction).ceil() as usize).clamp(1, n);
    let loud = &sorted[n / 2..];

    let loud_mean = loud.iter().sum::<f32>() / loud.len() as f32;
    if loud_mean <= 1e-10 {
        return 0.0;
    }
    let quiet_mean = sorted[..quiet_count].iter().sum::<f32>() / quiet_count as f32;
    (quiet_mean / loud_mean).clamp(0.0, 1.0)
}

/// Population std / mean; None for fewer than two values or a zero mean
pub fn coefficient_of_variation(values: &[f32]) -> Option<f32> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    if mean.abs() <= 1e-12 {
        return None;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
    let cv = variance.sqrt() / mean.abs();
    cv.is_finite().then_some(cv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_rms_counts() {
        assert_eq!(frame_rms(&[0.0; 1_000], 400, 160).len(), 4);
        assert_eq!(frame_rms(&[0.5; 100], 400, 160), vec![0.5]);
        assert!(frame_rms(&[], 400, 160).is_empty());
    }

    #[test]
    fn test_hysteresis_holds_through_dips() {
        let gate = EnergyGate { on: 0.3, off: 0.18 };
        let flags = segment(&[0.1, 0.35, 0.2, 0.19, 0.1, 0.25, 0.31], gate);
        assert_eq!(flags, vec![false, true, true, true, false, false, true]);
    }

    #[test]
    fn test_runs_and_interior_pauses() {
        let flags = [
            false, true, true, false, false, false, true, false, false, true, false,
        ];
        let runs = runs(&flags);
        assert_eq!(runs.len(), 7);
        assert_eq!(
            runs[2],
            Run {
                voiced: false,
                start: 3,
                len: 3
            }
        );

        // Leading and trailing silence are not pauses
        assert_eq!(interior_pauses_ms(&runs, 10.0, 0.0), vec![30.0, 20.0]);
        assert_eq!(interior_pauses_ms(&runs, 10.0, 25.0), vec![30.0]);
    }

    #[test]
    fn test_natural_pauses_need_irregularity() {
        assert!(!has_natural_pauses(&[200.0, 200.0, 200.0], 0.2));
        assert!(!has_natural_pauses(&[200.0], 0.2));
        assert!(has_natural_pauses(&[150.0, 450.0, 250.0], 0.2));
    }

    #[test]
    fn test_background_noise_ratio() {
        let mut rms = vec![1.0; 10];
        rms[0] = 0.1;
        // quietest 10% = [0.1]; loudest half mean = 1.0
        assert!((background_noise(&rms, 0.1) - 0.1).abs() < 1e-6);
        assert_eq!(background_noise(&[0.0; 8], 0.1), 0.0);
    }

    #[test]
    fn test_emotion_variance_floor() {
        assert_eq!(emotion_variance(&[0.5], &[true], 1.0), 0.0);
        assert_eq!(emotion_variance(&[0.5, 0.5], &[true, true], 1.0), 0.0);
        assert!(emotion_variance(&[0.2, 0.6], &[true, true], 1.0) > 0.4);
    }

    #[test]
    fn test_coefficient_of_variation() {
        assert_eq!(coefficient_of_variation(&[]), None);
        assert_eq!(coefficient_of_variation(&[0.0, 0.0]), None);
        let cv = coefficient_of_variation(&[1.0, 3.0]).unwrap();
        assert!((cv - 0.5).abs() < 1e-6);
    }
}
