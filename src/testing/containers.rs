//! Hand-assembled compressed payloads for decoder tests.
//!
//! FLAC frames use VERBATIM subframes, so the decoded PCM matches the input
//! to 16-bit precision. MP3 and AAC frames carry all-zero spectra and decode
//! to silence of a known length.

/// Samples per FLAC frame (the last frame may be shorter)
pub const FLAC_BLOCK: usize = 4096;
/// PCM frames produced by one MPEG-1 Layer III frame
pub const MP3_FRAME_SAMPLES: usize = 1152;
/// PCM frames produced by one AAC-LC raw data block
pub const AAC_FRAME_SAMPLES: usize = 1024;

/// MPEG-1 Layer III, 128 kbit/s, 44.1 kHz, mono, no CRC
const MP3_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0xC0];
const MP3_FRAME_LEN: usize = 417;
pub const MP3_SAMPLE_RATE: u32 = 44_100;

const OGG_SERIAL: u32 = 0x5656_0001;

struct BitWriter {
    bytes: Vec<u8>,
    current: u8,
    filled: u32,
}

impl BitWriter {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            current: 0,
            filled: 0,
        }
    }

    fn put(&mut self, value: u64, width: u32) {
        for shift in (0..width).rev() {
            self.current = (self.current << 1) | ((value >> shift) & 1) as u8;
            self.filled += 1;
            if self.filled == 8 {
                self.bytes.push(self.current);
                self.current = 0;
                self.filled = 0;
            }
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.filled > 0 {
            self.bytes.push(self.current << (8 - self.filled));
        }
        self.bytes
    }
}

fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x07
            } else {
                crc << 1
            };
        }
    }
    crc
}

fn crc16(data: &[u8]) -> u16 {
    let mut crc = 0u16;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x8005
            } else {
                crc << 1
            };
        }
    }
    crc
}

fn ogg_crc(data: &[u8]) -> u32 {
    let mut crc = 0u32;
    for &byte in data {
        crc ^= (byte as u32) << 24;
        for _ in 0..8 {
            crc = if crc & 0x8000_0000 != 0 {
                (crc << 1) ^ 0x04C1_1DB7
            } else {
                crc << 1
            };
        }
    }
    crc
}

fn to_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect()
}

fn flac_rate_code(sample_rate: u32) -> u64 {
    match sample_rate {
        8_000 => 0b0100,
        16_000 => 0b0101,
        22_050 => 0b0110,
        24_000 => 0b0111,
        32_000 => 0b1000,
        44_100 => 0b1001,
        48_000 => 0b1010,
        96_000 => 0b1011,
        // Taken from STREAMINFO
        _ => 0b0000,
    }
}

/// STREAMINFO metadata block body (34 bytes), mono 16-bit
fn flac_streaminfo(sample_rate: u32, total_samples: u64) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.put(FLAC_BLOCK as u64, 16);
    w.put(FLAC_BLOCK as u64, 16);
    w.put(0, 24);
    w.put(0, 24);
    w.put(sample_rate as u64, 20);
    w.put(0, 3);
    w.put(15, 5);
    w.put(total_samples, 36);
    // MD5 left unset
    w.put(0, 64);
    w.put(0, 64);
    w.finish()
}

fn put_utf8(w: &mut BitWriter, value: u32) {
    let value = value as u64;
    if value < 0x80 {
        w.put(value, 8);
    } else if value < 0x800 {
        w.put(0xC0 | (value >> 6), 8);
        w.put(0x80 | (value & 0x3F), 8);
    } else {
        w.put(0xE0 | (value >> 12), 8);
        w.put(0x80 | ((value >> 6) & 0x3F), 8);
        w.put(0x80 | (value & 0x3F), 8);
    }
}

fn flac_frame(sample_rate: u32, index: u32, block: &[i16]) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.put(0b11_1111_1111_1110, 14);
    w.put(0, 1);
    // fixed block size stream
    w.put(0, 1);
    // block size given as 16-bit (n - 1) after the frame number
    w.put(0b0111, 4);
    w.put(flac_rate_code(sample_rate), 4);
    // mono, 16 bits per sample
    w.put(0b0000, 4);
    w.put(0b100, 3);
    w.put(0, 1);
    put_utf8(&mut w, index);
    w.put((block.len() - 1) as u64, 16);
    let mut frame = w.finish();
    frame.push(crc8(&frame));

    // VERBATIM subframe, no wasted bits
    frame.push(0b0000_0010);
    for sample in block {
        frame.extend_from_slice(&sample.to_be_bytes());
    }
    let crc = crc16(&frame);
    frame.extend_from_slice(&crc.to_be_bytes());
    frame
}

fn flac_frames(samples: &[f32], sample_rate: u32) -> Vec<Vec<u8>> {
    to_i16(samples)
        .chunks(FLAC_BLOCK)
        .enumerate()
        .map(|(index, block)| flac_frame(sample_rate, index as u32, block))
        .collect()
}

/// Native FLAC stream, mono 16-bit
pub fn flac_bytes(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let mut out = b"fLaC".to_vec();
    // last metadata block, type STREAMINFO, 34 bytes
    out.extend_from_slice(&[0x80, 0x00, 0x00, 34]);
    out.extend(flac_streaminfo(sample_rate, samples.len() as u64));
    for frame in flac_frames(samples, sample_rate) {
        out.extend(frame);
    }
    out
}

fn ogg_page(packet: &[u8], header_type: u8, granule: u64, sequence: u32) -> Vec<u8> {
    let mut lacing = vec![255u8; packet.len() / 255];
    lacing.push((packet.len() % 255) as u8);
    assert!(lacing.len() <= 255, "packet too large for a single page");

    let mut page = b"OggS".to_vec();
    page.push(0);
    page.push(header_type);
    page.extend_from_slice(&granule.to_le_bytes());
    page.extend_from_slice(&OGG_SERIAL.to_le_bytes());
    page.extend_from_slice(&sequence.to_le_bytes());
    page.extend_from_slice(&[0; 4]);
    page.push(lacing.len() as u8);
    page.extend(lacing);
    page.extend_from_slice(packet);

    let crc = ogg_crc(&page);
    page[22..26].copy_from_slice(&crc.to_le_bytes());
    page
}

/// FLAC frames in an Ogg container, one packet per page
pub fn ogg_flac_bytes(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let mut identification = vec![0x7F];
    identification.extend_from_slice(b"FLAC");
    // mapping 1.0, one header packet after this one
    identification.extend_from_slice(&[1, 0, 0, 1]);
    identification.extend_from_slice(b"fLaC");
    identification.extend_from_slice(&[0x00, 0x00, 0x00, 34]);
    identification.extend(flac_streaminfo(sample_rate, samples.len() as u64));

    let vendor = b"voice_verify tests";
    let mut comment_body = (vendor.len() as u32).to_le_bytes().to_vec();
    comment_body.extend_from_slice(vendor);
    comment_body.extend_from_slice(&0u32.to_le_bytes());
    // last metadata block, type VORBIS_COMMENT
    let mut comment = vec![0x84];
    comment.extend_from_slice(&(comment_body.len() as u32).to_be_bytes()[1..]);
    comment.extend(comment_body);

    let mut out = ogg_page(&identification, 0x02, 0, 0);
    out.extend(ogg_page(&comment, 0x00, 0, 1));

    let frames = flac_frames(samples, sample_rate);
    let last = frames.len().saturating_sub(1);
    let mut granule = 0u64;
    for (index, frame) in frames.iter().enumerate() {
        granule = (granule + FLAC_BLOCK as u64).min(samples.len() as u64);
        let header_type = if index == last { 0x04 } else { 0x00 };
        out.extend(ogg_page(frame, header_type, granule, index as u32 + 2));
    }
    out
}

/// `frames` silent MPEG-1 Layer III frames at 44.1 kHz mono
///
/// Side information and main data are all zero: no big values, no count1
/// region, so every granule decodes to silence.
pub fn mp3_silence(frames: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(frames * MP3_FRAME_LEN);
    for _ in 0..frames {
        out.extend_from_slice(&MP3_FRAME_HEADER);
        out.resize(out.len() + MP3_FRAME_LEN - MP3_FRAME_HEADER.len(), 0);
    }
    out
}

fn aac_rate_index(sample_rate: u32) -> u64 {
    match sample_rate {
        96_000 => 0,
        88_200 => 1,
        64_000 => 2,
        48_000 => 3,
        44_100 => 4,
        32_000 => 5,
        24_000 => 6,
        22_050 => 7,
        16_000 => 8,
        12_000 => 9,
        11_025 => 10,
        8_000 => 11,
        other => panic!("no AAC sampling frequency index for {other} Hz"),
    }
}

/// AudioSpecificConfig for mono AAC-LC
fn aac_audio_specific_config(sample_rate: u32) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.put(2, 5);
    w.put(aac_rate_index(sample_rate), 4);
    w.put(1, 4);
    // frame length 1024, no core coder, no extension
    w.put(0, 3);
    w.finish()
}

/// Raw data block holding one single channel element with max_sfb = 0
fn aac_silent_frame() -> Vec<u8> {
    let mut w = BitWriter::new();
    // ID_SCE, element_instance_tag
    w.put(0, 3);
    w.put(0, 4);
    // global_gain
    w.put(100, 8);
    // ics_info: reserved, ONLY_LONG_SEQUENCE, sine window, max_sfb, no predictor
    w.put(0, 1);
    w.put(0, 2);
    w.put(0, 1);
    w.put(0, 6);
    w.put(0, 1);
    // no pulse, tns or gain control data
    w.put(0, 3);
    // ID_END
    w.put(7, 3);
    w.finish()
}

fn mp4_box(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = ((8 + payload.len()) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    out
}

fn mp4_full_box(kind: &[u8; 4], flags: u32, payload: &[u8]) -> Vec<u8> {
    // version 0
    let mut body = flags.to_be_bytes().to_vec();
    body[0] = 0;
    body.extend_from_slice(payload);
    mp4_box(kind, &body)
}

fn be32s(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

const UNITY_MATRIX: [u32; 9] = [0x0001_0000, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000];

fn mp4_moov(sample_rate: u32, frame_sizes: &[u32], data_offset: u32) -> Vec<u8> {
    let frames = frame_sizes.len() as u32;
    let duration = frames * AAC_FRAME_SAMPLES as u32;

    let mut mvhd = be32s(&[0, 0, sample_rate, duration, 0x0001_0000]);
    mvhd.extend_from_slice(&[0x01, 0x00]);
    mvhd.extend_from_slice(&[0; 10]);
    mvhd.extend(be32s(&UNITY_MATRIX));
    mvhd.extend_from_slice(&[0; 24]);
    mvhd.extend(be32s(&[2]));

    let mut tkhd = be32s(&[0, 0, 1, 0, duration, 0, 0]);
    // layer, alternate group, volume, reserved
    tkhd.extend_from_slice(&[0, 0, 0, 0, 0x01, 0x00, 0, 0]);
    tkhd.extend(be32s(&UNITY_MATRIX));
    tkhd.extend(be32s(&[0, 0]));

    let mut mdhd = be32s(&[0, 0, sample_rate, duration]);
    // language "und", pre_defined
    mdhd.extend_from_slice(&[0x55, 0xC4, 0, 0]);

    let mut hdlr = be32s(&[0]);
    hdlr.extend_from_slice(b"soun");
    hdlr.extend(be32s(&[0, 0, 0]));
    hdlr.extend_from_slice(b"SoundHandler\0");

    let mut dref = be32s(&[1]);
    dref.extend(mp4_full_box(b"url ", 1, &[]));
    let dinf = mp4_box(b"dinf", &mp4_full_box(b"dref", 0, &dref));

    let asc = aac_audio_specific_config(sample_rate);
    let mut decoder_specific = vec![0x05, asc.len() as u8];
    decoder_specific.extend(asc);
    // AAC (ISO/IEC 14496-3), audio stream
    let mut decoder_config = vec![0x40, 0x15, 0, 0, 0];
    decoder_config.extend(be32s(&[0, 0]));
    decoder_config.extend(decoder_specific);
    let mut es = vec![0x00, 0x01, 0x00, 0x04, decoder_config.len() as u8];
    es.extend(decoder_config);
    es.extend_from_slice(&[0x06, 0x01, 0x02]);
    let mut esds_body = vec![0x03, es.len() as u8];
    esds_body.extend(es);
    let esds = mp4_full_box(b"esds", 0, &esds_body);

    let mut mp4a = vec![0; 6];
    mp4a.extend_from_slice(&[0x00, 0x01]);
    mp4a.extend_from_slice(&[0; 8]);
    // mono, 16-bit, no compression id, packet size 0
    mp4a.extend_from_slice(&[0x00, 0x01, 0x00, 0x10, 0, 0, 0, 0]);
    mp4a.extend(be32s(&[sample_rate << 16]));
    mp4a.extend(esds);

    let mut stsd = be32s(&[1]);
    stsd.extend(mp4_box(b"mp4a", &mp4a));

    let mut stsz = be32s(&[0, frames]);
    stsz.extend(be32s(frame_sizes));

    let mut stbl = mp4_full_box(b"stsd", 0, &stsd);
    stbl.extend(mp4_full_box(
        b"stts",
        0,
        &be32s(&[1, frames, AAC_FRAME_SAMPLES as u32]),
    ));
    stbl.extend(mp4_full_box(b"stsc", 0, &be32s(&[1, 1, frames, 1])));
    stbl.extend(mp4_full_box(b"stsz", 0, &stsz));
    stbl.extend(mp4_full_box(b"stco", 0, &be32s(&[1, data_offset])));

    let mut minf = mp4_full_box(b"smhd", 0, &[0; 4]);
    minf.extend(dinf);
    minf.extend(mp4_box(b"stbl", &stbl));

    let mut mdia = mp4_full_box(b"mdhd", 0, &mdhd);
    mdia.extend(mp4_full_box(b"hdlr", 0, &hdlr));
    mdia.extend(mp4_box(b"minf", &minf));

    let mut trak = mp4_full_box(b"tkhd", 7, &tkhd);
    trak.extend(mp4_box(b"mdia", &mdia));

    let mut moov = mp4_full_box(b"mvhd", 0, &mvhd);
    moov.extend(mp4_box(b"trak", &trak));
    mp4_box(b"moov", &moov)
}

/// `frames` silent AAC-LC frames in an M4A (ISO BMFF) container, mono
pub fn m4a_silence(frames: usize, sample_rate: u32) -> Vec<u8> {
    let frame = aac_silent_frame();
    let sizes = vec![frame.len() as u32; frames];

    let mut ftyp_body = b"M4A ".to_vec();
    ftyp_body.extend(be32s(&[0]));
    ftyp_body.extend_from_slice(b"M4A mp42isom");
    let ftyp = mp4_box(b"ftyp", &ftyp_body);

    // moov length does not depend on the chunk offset value
    let moov_len = mp4_moov(sample_rate, &sizes, 0).len();
    let data_offset = (ftyp.len() + moov_len + 8) as u32;
    let moov = mp4_moov(sample_rate, &sizes, data_offset);

    let mdat = mp4_box(b"mdat", &frame.repeat(frames));

    let mut out = ftyp;
    out.extend(moov);
    out.extend(mdat);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flac_crc8_check_value() {
        assert_eq!(crc8(b"123456789"), 0xF4);
    }

    #[test]
    fn test_flac_crc16_check_value() {
        assert_eq!(crc16(b"123456789"), 0xFEE8);
    }

    #[test]
    fn test_ogg_crc_check_value() {
        assert_eq!(ogg_crc(b"123456789"), 0x89A1_897F);
    }

    #[test]
    fn test_streaminfo_is_34_bytes() {
        assert_eq!(flac_streaminfo(16_000, 1_000).len(), 34);
    }

    #[test]
    fn test_mp4_chunk_offset_points_at_first_frame() {
        let bytes = m4a_silence(3, 48_000);
        let mdat = bytes
            .windows(4)
            .position(|w| w == b"mdat")
            .unwrap();
        let stco = bytes.windows(4).position(|w| w == b"stco").unwrap();
        let offset = u32::from_be_bytes(bytes[stco + 12..stco + 16].try_into().unwrap());
        assert_eq!(offset as usize, mdat + 4);
    }
}
