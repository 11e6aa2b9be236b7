// Analysis module - acoustic analysis of decoded speech
//
// Pipeline: AudioSample → framing → envelope / spectra / pitch → FeatureVector

pub mod features;

// Re-export commonly used types for convenience
pub use features::{
    Analysis, AuxiliaryDescriptors, FeatureExtractor, FeatureName, FeatureVector, ProsodyStats,
    AUXILIARY_MODEL_INPUTS, MFCC_COUNT,
};
