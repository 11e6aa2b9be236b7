//! Synthetic PCM and in-memory WAV payloads.
//!
//! Noise uses a seeded `StdRng` so every test run sees identical samples.

use std::f32::consts::PI;
use std::io::Cursor;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Steady sine tone
pub fn sine_wave(sample_rate: u32, freq_hz: f32, amplitude: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (2.0 * PI * freq_hz * i as f32 / sample_rate as f32).sin() * amplitude)
        .collect()
}

/// Tone whose frequency swings ±`depth_hz` around `base_hz` at `rate_hz`
pub fn vibrato_tone(
    sample_rate: u32,
    base_hz: f32,
    depth_hz: f32,
    rate_hz: f32,
    amplitude: f32,
    len: usize,
) -> Vec<f32> {
    let mut phase = 0.0f32;
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let freq = base_hz + depth_hz * (2.0 * PI * rate_hz * t).sin();
            phase += freq / sample_rate as f32;
            if phase >= 1.0 {
                phase -= 1.0;
            }
            (2.0 * PI * phase).sin() * amplitude
        })
        .collect()
}

/// Uniform white noise in [-amplitude, amplitude]
pub fn white_noise(seed: u64, amplitude: f32, len: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| rng.gen_range(-amplitude..=amplitude))
        .collect()
}

/// Tone bursts separated by silent gaps: `(burst_ms, gap_ms_after)` per syllable
pub fn tone_bursts(
    sample_rate: u32,
    freq_hz: f32,
    amplitude: f32,
    pattern: &[(u32, u32)],
) -> Vec<f32> {
    let per_ms = sample_rate as usize / 1000;
    let mut out = Vec::new();
    for &(burst_ms, gap_ms) in pattern {
        let burst_len = burst_ms as usize * per_ms;
        let start = out.len();
        out.extend((0..burst_len).map(|i| {
            let t = (start + i) as f32 / sample_rate as f32;
            (2.0 * PI * freq_hz * t).sin() * amplitude
        }));
        out.extend(std::iter::repeat(0.0).take(gap_ms as usize * per_ms));
    }
    out
}

/// Mono 32-bit float WAV bytes
pub fn wav_bytes(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &sample in samples {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Stereo 16-bit integer WAV bytes
pub fn wav_bytes_i16_stereo(left: &[f32], right: &[f32], sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for (&l, &r) in left.iter().zip(right) {
            writer.write_sample((l * i16::MAX as f32) as i16).unwrap();
            writer.write_sample((r * i16::MAX as f32) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}
