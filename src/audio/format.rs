// Container format identification
//
// Formats are resolved from the payload's leading bytes when possible and
// from the caller's declared format (extension or MIME type) otherwise.

use serde::{Deserialize, Serialize};

use crate::error::IngestionError;

/// Audio containers the ingestor knows how to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    Ogg,
    M4a,
    Flac,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 5] = [
        AudioFormat::Mp3,
        AudioFormat::Wav,
        AudioFormat::Ogg,
        AudioFormat::M4a,
        AudioFormat::Flac,
    ];

    /// Canonical file extension, also used as the symphonia probe hint
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Ogg => "ogg",
            AudioFormat::M4a => "m4a",
            AudioFormat::Flac => "flac",
        }
    }

    /// Parse a declared format given as an extension or MIME type
    ///
    /// Matching is case-insensitive and tolerates a leading dot.
    pub fn from_declared(declared: &str) -> Option<Self> {
        let normalized = declared.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "mp3" | "mpeg" | "audio/mpeg" | "audio/mp3" => Some(AudioFormat::Mp3),
            "wav" | "wave" | "audio/wav" | "audio/wave" | "audio/x-wav" => Some(AudioFormat::Wav),
            "ogg" | "oga" | "audio/ogg" | "audio/vorbis" => Some(AudioFormat::Ogg),
            "m4a" | "mp4" | "aac" | "audio/mp4" | "audio/x-m4a" | "audio/aac" => {
                Some(AudioFormat::M4a)
            }
            "flac" | "audio/flac" | "audio/x-flac" => Some(AudioFormat::Flac),
            _ => None,
        }
    }

    /// Identify a container from its leading bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
            return Some(AudioFormat::Wav);
        }
        if bytes.starts_with(b"fLaC") {
            return Some(AudioFormat::Flac);
        }
        if bytes.starts_with(b"OggS") {
            return Some(AudioFormat::Ogg);
        }
        if bytes.len() >= 8 && &bytes[4..8] == b"ftyp" {
            return Some(AudioFormat::M4a);
        }
        if bytes.starts_with(b"ID3") {
            return Some(AudioFormat::Mp3);
        }
        // MPEG audio frame sync: 11 set bits, layer bits non-zero (00 is ADTS AAC)
        if bytes.len() >= 2 && bytes[0] == 0xFF && (bytes[1] & 0xE0) == 0xE0 && (bytes[1] & 0x06) != 0
        {
            return Some(AudioFormat::Mp3);
        }
        None
    }

    /// Resolve the container for a payload against an allow-list
    ///
    /// Sniffed content wins over the declared format, so a recognizable
    /// container is accepted whatever name it arrived under. The declared
    /// format is only consulted when the content cannot be identified; an
    /// unrecognized declaration is then reported back as the offending
    /// format.
    pub fn resolve(
        bytes: &[u8],
        declared: Option<&str>,
        allowed: &[AudioFormat],
    ) -> Result<Self, IngestionError> {
        let declared = declared.map(str::trim).filter(|value| !value.is_empty());

        let format = match (Self::sniff(bytes), declared) {
            (Some(sniffed), _) => sniffed,
            (None, Some(value)) => {
                Self::from_declared(value).ok_or_else(|| IngestionError::UnsupportedFormat {
                    format: value.to_string(),
                })?
            }
            (None, None) => {
                return Err(IngestionError::UnsupportedFormat {
                    format: "unrecognized".to_string(),
                })
            }
        };

        if !allowed.contains(&format) {
            return Err(IngestionError::UnsupportedFormat {
                format: format.extension().to_string(),
            });
        }

        Ok(format)
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
