//! Serialized model bundle shared by the training tool and the desktop form.
//!
//! The bundle is a single pretty-printed JSON file holding the decision tree,
//! the label encoder that maps its class indices back to category names, and
//! the feature names the tree was trained on.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tree::DecisionTree;
use super::{Classifier, LabelEncoder, PredictError};
use crate::features::{FEATURE_NAMES, PollutantFeatures};

/// Current bundle format version.
pub const MODEL_FORMAT_VERSION: i64 = 1;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid model JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid model bundle: {0}")]
    Invalid(String),
}

/// Trained classifier plus the tables needed to interpret its output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub format_version: i64,
    pub feature_names: Vec<String>,
    pub model: DecisionTree,
    pub label_encoder: LabelEncoder,
}

impl ModelBundle {
    /// Bundle a tree trained on the standard pollutant feature layout.
    pub fn new(model: DecisionTree, label_encoder: LabelEncoder) -> Self {
        Self {
            format_version: MODEL_FORMAT_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
            model,
            label_encoder,
        }
    }

    /// Validate structural invariants of the bundle.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.format_version != MODEL_FORMAT_VERSION {
            return Err(ArtifactError::Invalid(format!(
                "unsupported format_version {} (expected {MODEL_FORMAT_VERSION})",
                self.format_version
            )));
        }
        self.model.validate().map_err(ArtifactError::Invalid)?;
        if self.model.n_features != self.feature_names.len() {
            return Err(ArtifactError::Invalid(format!(
                "model expects {} features but {} names are stored",
                self.model.n_features,
                self.feature_names.len()
            )));
        }
        if self.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(ArtifactError::Invalid(format!(
                "feature names {:?} do not match {:?}",
                self.feature_names, FEATURE_NAMES
            )));
        }
        self.label_encoder
            .validate()
            .map_err(|err| ArtifactError::Invalid(err.to_string()))?;
        if self.model.n_classes != self.label_encoder.len() {
            return Err(ArtifactError::Invalid(format!(
                "model has {} classes but the label encoder has {}",
                self.model.n_classes,
                self.label_encoder.len()
            )));
        }
        Ok(())
    }

    /// Load and validate a bundle from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        if !path.is_file() {
            return Err(ArtifactError::NotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bundle: Self = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        bundle.validate()?;
        tracing::info!(
            "Loaded model from {} ({} classes, depth {})",
            path.display(),
            bundle.label_encoder.len(),
            bundle.model.depth()
        );
        Ok(bundle)
    }

    /// Write the bundle as pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| ArtifactError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let bytes = serde_json::to_vec_pretty(self).map_err(|source| ArtifactError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, bytes).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Predict the AQI category name for a reading.
    pub fn predict_category(&self, features: &PollutantFeatures) -> Result<&str, PredictError> {
        let vector = features.to_vector();
        if vector.len() != self.model.n_features {
            return Err(PredictError::FeatureLength {
                expected: self.model.n_features,
                found: vector.len(),
            });
        }
        let class_idx = self.model.predict_class_index(&vector);
        Ok(self.label_encoder.inverse_transform(class_idx)?)
    }
}
