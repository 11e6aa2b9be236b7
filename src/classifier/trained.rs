// Trained scorer - logistic regression from a JSON artifact
//
// Artifact schema:
//   {
//     "format": "logistic_regression",
//     "version": 1,
//     "weights":   { "pitch_variance": .., ... all six features },
//     "means":     { ... }   optional, defaults to 0
//     "scales":    { ... }   optional, defaults to 1, must be > 0
//     "intercept": -0.3,     optional, defaults to 0
//     "auxiliary": {         optional
//       "weights": [ 17 values ],
//       "means":   [ 17 values ]   optional, defaults to 0
//       "scales":  [ 17 values ]   optional, defaults to 1, must be > 0
//     }
//   }
//
// contribution_i = w_i · (x_i - mean_i) / scale_i
// auxiliary      = Σ_j a_j · (y_j - mean_j) / scale_j
// P(AI) = sigmoid(Σ contribution_i + auxiliary + intercept)
//
// y is AuxiliaryDescriptors::model_inputs. Like the intercept, the
// auxiliary term shifts the probability without appearing among the
// per-feature contributions. Without descriptors it is 0 (every y_j at its
// mean).

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{sigmoid, ClassificationResult, FeatureContribution, Label, Scorer, ScorerKind};
use crate::analysis::{AuxiliaryDescriptors, FeatureName, FeatureVector, AUXILIARY_MODEL_INPUTS};
use crate::error::ModelLoadError;
use crate::language::Language;

pub const MODEL_FORMAT: &str = "logistic_regression";
pub const MODEL_VERSION: u32 = 1;

/// One coefficient per feature; every field is required when present
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureCoefficients {
    pub pitch_variance: f32,
    pub spectral_flatness: f32,
    pub natural_pauses: f32,
    pub speech_rate: f32,
    pub emotion_variance: f32,
    pub background_noise: f32,
}

impl FeatureCoefficients {
    pub const fn splat(value: f32) -> Self {
        Self {
            pitch_variance: value,
            spectral_flatness: value,
            natural_pauses: value,
            speech_rate: value,
            emotion_variance: value,
            background_noise: value,
        }
    }

    pub fn get(&self, name: FeatureName) -> f32 {
        match name {
            FeatureName::PitchVariance => self.pitch_variance,
            FeatureName::SpectralFlatness => self.spectral_flatness,
            FeatureName::NaturalPauses => self.natural_pauses,
            FeatureName::SpeechRate => self.speech_rate,
            FeatureName::EmotionVariance => self.emotion_variance,
            FeatureName::BackgroundNoise => self.background_noise,
        }
    }
}

fn zero_means() -> FeatureCoefficients {
    FeatureCoefficients::splat(0.0)
}

fn unit_scales() -> FeatureCoefficients {
    FeatureCoefficients::splat(1.0)
}

/// Weights over `AuxiliaryDescriptors::model_inputs`, index-aligned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuxiliaryCoefficients {
    pub weights: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub means: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scales: Option<Vec<f32>>,
}

impl AuxiliaryCoefficients {
    fn validate(&self) -> Result<(), ModelLoadError> {
        let columns = [
            ("weights", Some(&self.weights)),
            ("means", self.means.as_ref()),
            ("scales", self.scales.as_ref()),
        ];
        for (name, values) in columns {
            let Some(values) = values else { continue };
            if values.len() != AUXILIARY_MODEL_INPUTS {
                return Err(ModelLoadError::Invalid {
                    reason: format!(
                        "auxiliary {} has {} values, expected {}",
                        name,
                        values.len(),
                        AUXILIARY_MODEL_INPUTS
                    ),
                });
            }
            if let Some(i) = values.iter().position(|v| !v.is_finite()) {
                return Err(ModelLoadError::Invalid {
                    reason: format!("non-finite auxiliary {} at index {}", name, i),
                });
            }
        }
        if let Some(scales) = &self.scales {
            if let Some(i) = scales.iter().position(|&s| s <= 0.0) {
                return Err(ModelLoadError::Invalid {
                    reason: format!("auxiliary scale at index {} must be > 0", i),
                });
            }
        }
        Ok(())
    }

    /// Weighted, standardized sum over the descriptor model inputs
    fn term(&self, descriptors: &AuxiliaryDescriptors) -> f32 {
        descriptors
            .model_inputs()
            .iter()
            .enumerate()
            .map(|(i, &y)| {
                let mean = self.means.as_ref().map_or(0.0, |m| m[i]);
                let scale = self.scales.as_ref().map_or(1.0, |s| s[i]);
                self.weights[i] * (y - mean) / scale
            })
            .sum()
    }
}

/// Serialized logistic-regression model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format: String,
    pub version: u32,
    pub weights: FeatureCoefficients,
    #[serde(default = "zero_means")]
    pub means: FeatureCoefficients,
    #[serde(default = "unit_scales")]
    pub scales: FeatureCoefficients,
    #[serde(default)]
    pub intercept: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary: Option<AuxiliaryCoefficients>,
}

impl ModelArtifact {
    /// Read and validate an artifact from disk
    ///
    /// # Errors
    /// * `Missing` - no file at `path`
    /// * `Io` - file exists but cannot be read
    /// * `Parse` - not JSON for this schema
    /// * `Invalid` - wrong format tag or version, non-finite values, scale ≤ 0,
    ///   auxiliary columns of the wrong length
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ModelLoadError::Missing {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ModelLoadError::Io {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

        let artifact: ModelArtifact =
            serde_json::from_str(&contents).map_err(|e| ModelLoadError::Parse {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;

        artifact.validate()?;
        Ok(artifact)
    }

    pub fn validate(&self) -> Result<(), ModelLoadError> {
        if self.format != MODEL_FORMAT {
            return Err(ModelLoadError::Invalid {
                reason: format!("unsupported format '{}'", self.format),
            });
        }
        if self.version != MODEL_VERSION {
            return Err(ModelLoadError::Invalid {
                reason: format!("unsupported version {}", self.version),
            });
        }
        if !self.intercept.is_finite() {
            return Err(ModelLoadError::Invalid {
                reason: "intercept is not finite".to_string(),
            });
        }

        for name in FeatureName::ALL {
            let (w, m, s) = (
                self.weights.get(name),
                self.means.get(name),
                self.scales.get(name),
            );
            if !(w.is_finite() && m.is_finite() && s.is_finite()) {
                return Err(ModelLoadError::Invalid {
                    reason: format!("non-finite coefficient for {}", name),
                });
            }
            if s <= 0.0 {
                return Err(ModelLoadError::Invalid {
                    reason: format!("scale for {} must be > 0, got {}", name, s),
                });
            }
        }
        if let Some(auxiliary) = &self.auxiliary {
            auxiliary.validate()?;
        }
        Ok(())
    }
}

/// Scorer backed by a validated ModelArtifact
///
/// Language-independent: the artifact carries no per-language terms.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedScorer {
    artifact: ModelArtifact,
}

impl TrainedScorer {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        Ok(Self {
            artifact: ModelArtifact::load(path)?,
        })
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelLoadError> {
        artifact.validate()?;
        Ok(Self { artifact })
    }
}

impl Scorer for TrainedScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Trained
    }

    fn score(
        &self,
        features: &FeatureVector,
        descriptors: Option<&AuxiliaryDescriptors>,
        _language: Option<Language>,
    ) -> Option<ClassificationResult> {
        let model = &self.artifact;
        let contributions: Vec<FeatureContribution> = FeatureName::ALL
            .iter()
            .map(|&feature| FeatureContribution {
                feature,
                contribution: model.weights.get(feature)
                    * (features.value(feature) - model.means.get(feature))
                    / model.scales.get(feature),
            })
            .collect();

        let raw: f32 = contributions.iter().map(|c| c.contribution).sum();
        let auxiliary = match (&model.auxiliary, descriptors) {
            (Some(coefficients), Some(descriptors)) => coefficients.term(descriptors),
            _ => 0.0,
        };
        let probability = sigmoid(raw + auxiliary + model.intercept);
        if !raw.is_finite() || !auxiliary.is_finite() || !probability.is_finite() {
            return None;
        }

        let label = if probability > 0.5 {
            Label::AiGenerated
        } else {
            Label::Human
        };

        Some(ClassificationResult::from_parts(
            label,
            probability,
            contributions,
            *features,
            ScorerKind::Trained,
        ))
    }
}
