// AudioSample - immutable mono PCM buffer handed to the analysis stages

/// Sample rate every AudioSample is resampled to before analysis
pub const ANALYSIS_SAMPLE_RATE: u32 = 16_000;

/// Immutable mono PCM buffer
///
/// Created by the ingestor from raw bytes and owned by a single pipeline
/// invocation. Samples are f32 in [-1.0, 1.0]. There are no mutating
/// accessors; the buffer is dropped once analysis completes.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSample {
    sample_rate: u32,
    samples: Vec<f32>,
}

impl AudioSample {
    /// Wrap mono samples recorded at `sample_rate`
    pub fn new(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            sample_rate,
            samples,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Always 1; multi-channel input is mixed down during ingestion
    pub fn channels(&self) -> u16 {
        1
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}
