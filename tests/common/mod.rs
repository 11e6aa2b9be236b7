#![allow(dead_code)]

use std::f32::consts::PI;
use std::io::Cursor;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SAMPLE_RATE: u32 = 16_000;

/// Constant-pitch, constant-level tone
pub fn steady_tone(sample_rate: u32, freq_hz: f32, secs: f32) -> Vec<f32> {
    let len = (sample_rate as f32 * secs) as usize;
    (0..len)
        .map(|i| 0.5 * (2.0 * PI * freq_hz * i as f32 / sample_rate as f32).sin())
        .collect()
}

/// Vibrato tone bursts separated by irregular gaps over a faint noise bed
pub fn speechlike(sample_rate: u32, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let pattern_ms = [(220, 90), (180, 260), (300, 140), (160, 420), (240, 180), (200, 0)];

    let mut out = Vec::new();
    let mut phase = 0.0f32;
    for (burst_ms, gap_ms) in pattern_ms {
        let burst = (sample_rate as usize * burst_ms) / 1000;
        let level = rng.gen_range(0.2..0.6);
        for i in 0..burst {
            let t = i as f32 / sample_rate as f32;
            let f0 = 140.0 + 35.0 * (2.0 * PI * 5.0 * t).sin();
            phase += 2.0 * PI * f0 / sample_rate as f32;
            out.push(level * phase.sin() + rng.gen_range(-0.01..0.01));
        }
        let gap = (sample_rate as usize * gap_ms) / 1000;
        out.extend((0..gap).map(|_| rng.gen_range(-0.01..0.01)));
    }
    out
}

/// Mono 32-bit float WAV
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

/// Stereo 16-bit PCM WAV with identical channels
pub fn wav_bytes_i16_stereo(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &sample in samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(value).unwrap();
            writer.write_sample(value).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}
