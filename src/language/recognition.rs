// Recognition module - pluggable speech-to-text and script matching
//
// No recognizer ships with the crate. Embedders implement SpeechRecognizer
// and hand it to the resolver; the transcript's writing system then
// identifies the language.

use super::Language;
use crate::audio::AudioSample;
use crate::error::RecognitionUnavailable;

/// Output of a speech-to-text pass
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    /// Recognizer's own confidence in [0, 1]
    pub confidence: f32,
}

/// Speech-to-text backend
///
/// Implementations must be shareable across requests; the resolver calls
/// `transcribe` from whichever thread is running the pipeline.
pub trait SpeechRecognizer: Send + Sync {
    fn transcribe(&self, sample: &AudioSample) -> Result<Transcript, RecognitionUnavailable>;
}

/// Recognizer used when none is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecognizer;

impl SpeechRecognizer for NoRecognizer {
    fn transcribe(&self, _sample: &AudioSample) -> Result<Transcript, RecognitionUnavailable> {
        Err(RecognitionUnavailable::NotConfigured)
    }
}

/// Language whose script contains `c`
pub fn script_language(c: char) -> Option<Language> {
    match c as u32 {
        0x0B80..=0x0BFF => Some(Language::Tamil),
        0x0900..=0x097F => Some(Language::Hindi),
        0x0D00..=0x0D7F => Some(Language::Malayalam),
        0x0C00..=0x0C7F => Some(Language::Telugu),
        _ if c.is_alphabetic() && (c.is_ascii() || ('\u{00C0}'..='\u{024F}').contains(&c)) => {
            Some(Language::English)
        }
        _ => None,
    }
}

/// Most frequent script in `text` and its share of all letters
///
/// Letters from scripts outside the five count towards the total but
/// never win. Ties resolve in the fixed language order.
pub fn dominant_script(text: &str) -> Option<(Language, f32)> {
    let mut counts = [0usize; 5];
    let mut letters = 0usize;

    for c in text.chars() {
        match script_language(c) {
            Some(language) => {
                counts[language.index()] += 1;
                letters += 1;
            }
            None if c.is_alphabetic() => letters += 1,
            None => {}
        }
    }

    if letters == 0 {
        return None;
    }

    let (best, count) = counts
        .iter()
        .enumerate()
        .fold((0, 0), |acc, (i, &n)| if n > acc.1 { (i, n) } else { acc });
    if count == 0 {
        return None;
    }

    Some((Language::ALL[best], count as f32 / letters as f32))
}
