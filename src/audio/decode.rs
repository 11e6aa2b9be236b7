// Decode module - container payload to mono PCM at the native sample rate
//
// WAV goes through hound; MP3, OGG/Vorbis, FLAC and M4A/AAC go through
// symphonia. Both paths mix down to mono while decoding so the decoded
// buffer never holds more than one channel, and both enforce the decoded
// size limit before the full buffer is materialized.

use std::io::{self, Cursor};

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::format::AudioFormat;
use super::resample::mix_to_mono;
use crate::error::{IngestionError, SizeStage};

const BYTES_PER_SAMPLE: usize = std::mem::size_of::<f32>();

/// Mono PCM at the payload's native rate
#[derive(Debug)]
pub(crate) struct DecodedAudio {
    pub mono: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Decode a payload whose container has already been resolved
pub(crate) fn decode(
    bytes: &[u8],
    format: AudioFormat,
    max_decoded_bytes: usize,
) -> Result<DecodedAudio, IngestionError> {
    match format {
        AudioFormat::Wav => decode_wav(bytes, max_decoded_bytes),
        other => decode_compressed(bytes, other, max_decoded_bytes),
    }
}

fn check_decoded_size(decoded_bytes: usize, limit: usize) -> Result<(), IngestionError> {
    if decoded_bytes > limit {
        return Err(IngestionError::SizeLimit {
            stage: SizeStage::Decoded,
            actual: decoded_bytes,
            limit,
        });
    }
    Ok(())
}

fn decode_wav(bytes: &[u8], max_decoded_bytes: usize) -> Result<DecodedAudio, IngestionError> {
    let mut reader = hound::WavReader::new(bytes)?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(IngestionError::decode("WAV has zero channels"));
    }
    if spec.sample_rate == 0 {
        return Err(IngestionError::decode("WAV has zero sample rate"));
    }

    let total_samples = reader.len() as usize;
    check_decoded_size(
        total_samples.saturating_mul(BYTES_PER_SAMPLE),
        max_decoded_bytes,
    )?;

    let interleaved = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<f32>, _>>()?,
        hound::SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(IngestionError::decode(format!(
                    "unsupported bits_per_sample={}",
                    spec.bits_per_sample
                )));
            }
            let scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|v| v as f32 / scale))
                .collect::<Result<Vec<f32>, _>>()?
        }
    };

    let mut mono = Vec::with_capacity(interleaved.len() / spec.channels as usize);
    mix_to_mono(&interleaved, spec.channels as usize, &mut mono);

    Ok(DecodedAudio {
        mono,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

fn decode_compressed(
    bytes: &[u8],
    format: AudioFormat,
    max_decoded_bytes: usize,
) -> Result<DecodedAudio, IngestionError> {
    // Transient decode buffer: owned by the media source stream and released
    // when the reader drops, on success and on every error return.
    let source = Cursor::new(bytes.to_vec());
    let stream = MediaSourceStream::new(Box::new(source), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    hint.with_extension(format.extension());

    let probed = symphonia::default::get_probe().format(
        &hint,
        stream,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut reader = probed.format;

    let track = reader
        .tracks()
        .iter()
        .find(|track| track.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| IngestionError::decode("no decodable audio track"))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut mono = Vec::new();
    let mut decoded_bytes = 0usize;

    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err)) if err.kind() == io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(err.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(reason)) => {
                log::debug!("[Decode] Skipping corrupt {} packet: {}", format, reason);
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let spec = *decoded.spec();
        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }
        let channel_count = spec.channels.count();

        decoded_bytes =
            decoded_bytes.saturating_add(frames * channel_count * BYTES_PER_SAMPLE);
        check_decoded_size(decoded_bytes, max_decoded_bytes)?;

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        mix_to_mono(buffer.samples(), channel_count, &mut mono);

        sample_rate = spec.rate;
        channels = channel_count as u16;
    }

    if sample_rate == 0 {
        return Err(IngestionError::decode(format!(
            "{} stream has no sample rate",
            format
        )));
    }

    Ok(DecodedAudio {
        mono,
        sample_rate,
        channels,
    })
}
