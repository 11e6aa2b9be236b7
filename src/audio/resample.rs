// Resample module - mono mixdown and sample rate conversion
//
// Conversion uses rubato's windowed-sinc resampler in fixed-input-size
// chunks, which handles any rate ratio (including co-prime rates such as
// 7999 Hz). The resampler's output delay is trimmed and the output
// truncated to exactly ceil(n · to / from) samples, so a buffer of N
// seconds stays N seconds long.

use rubato::{
    calculate_cutoff, Resampler, SincFixedIn, SincInterpolationParameters,
    SincInterpolationType, WindowFunction,
};

use crate::error::IngestionError;

/// Input frames per resampler chunk
const RESAMPLE_CHUNK: usize = 1024;

/// Sinc kernel length in taps
const SINC_LEN: usize = 128;

/// Kernel table oversampling; intermediate points are linearly interpolated
const OVERSAMPLING: usize = 128;

const WINDOW: WindowFunction = WindowFunction::BlackmanHarris2;

/// Average interleaved frames into mono samples appended to `out`
pub(crate) fn mix_to_mono(interleaved: &[f32], channels: usize, out: &mut Vec<f32>) {
    if channels <= 1 {
        out.extend_from_slice(interleaved);
        return;
    }

    for chunk in interleaved.chunks(channels) {
        let sum: f32 = chunk.iter().copied().sum();
        out.push(sum / channels as f32);
    }
}

/// Number of samples `len` input samples occupy after conversion
pub(crate) fn resampled_len(len: usize, from_rate: u32, to_rate: u32) -> usize {
    (len as u64 * to_rate as u64).div_ceil(from_rate as u64) as usize
}

/// Convert a mono buffer from `from_rate` to `to_rate`
pub(crate) fn resample(
    mono: Vec<f32>,
    from_rate: u32,
    to_rate: u32,
) -> Result<Vec<f32>, IngestionError> {
    if from_rate == to_rate || mono.is_empty() {
        return Ok(mono);
    }
    if from_rate == 0 || to_rate == 0 {
        return Err(IngestionError::decode(format!(
            "cannot resample {} Hz to {} Hz",
            from_rate, to_rate
        )));
    }

    let params = SincInterpolationParameters {
        sinc_len: SINC_LEN,
        f_cutoff: calculate_cutoff(SINC_LEN, WINDOW),
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: OVERSAMPLING,
        window: WINDOW,
    };
    let mut resampler = SincFixedIn::<f32>::new(
        to_rate as f64 / from_rate as f64,
        1.0,
        params,
        RESAMPLE_CHUNK,
        1,
    )?;

    let delay = resampler.output_delay();
    let expected = resampled_len(mono.len(), from_rate, to_rate);
    let mut out = Vec::with_capacity(expected + delay + resampler.output_frames_max());

    let mut pos = 0;
    while mono.len() - pos >= resampler.input_frames_next() {
        let needed = resampler.input_frames_next();
        let input = [&mono[pos..pos + needed]];
        let chunk = resampler.process(&input[..], None)?;
        out.extend_from_slice(&chunk[0]);
        pos += needed;
    }

    if pos < mono.len() {
        let input = [&mono[pos..]];
        let chunk = resampler.process_partial(Some(&input[..]), None)?;
        out.extend_from_slice(&chunk[0]);
    }

    // Feed silence until the delay line has released every input sample
    let silence = vec![0.0f32; resampler.input_frames_max()];
    while out.len() < expected + delay {
        let input = [&silence[..resampler.input_frames_next()]];
        let chunk = resampler.process(&input[..], None)?;
        if chunk[0].is_empty() {
            break;
        }
        out.extend_from_slice(&chunk[0]);
    }

    if out.len() < expected + delay {
        return Err(IngestionError::decode(format!(
            "resampler produced {} of {} samples",
            out.len().saturating_sub(delay),
            expected
        )));
    }

    out.drain(..delay);
    out.truncate(expected);
    Ok(out)
}
