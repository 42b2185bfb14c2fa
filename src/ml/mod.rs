//! Machine learning helpers for training and inference.
//!
//! Small, dependency-free classifiers that train deterministically from a seed and
//! export to JSON, plus the evaluation utilities the command-line tools print.

pub mod artifact;
pub mod forest;
pub mod label_encoder;
pub mod metrics;
pub mod split;
pub mod tree;

use thiserror::Error;

pub use label_encoder::{LabelEncoder, LabelError};

/// Errors raised while preparing data for or fitting a model.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("Mismatched X/Y lengths ({rows} rows, {labels} labels)")]
    LengthMismatch { rows: usize, labels: usize },
    #[error("Empty dataset")]
    Empty,
    #[error("Need at least 2 classes, found {0}")]
    TooFewClasses(usize),
    #[error("Row {row} has {found} features but expected {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("Label {label} at row {row} is out of range for {n_classes} classes")]
    LabelOutOfRange {
        row: usize,
        label: usize,
        n_classes: usize,
    },
    #[error("Cannot split {rows} rows into {parts} parts")]
    TooFewRows { rows: usize, parts: usize },
    #[error(transparent)]
    Label(#[from] LabelError),
}

/// Errors raised while predicting with a trained model.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Feature vector has {found} values but the model expects {expected}")]
    FeatureLength { expected: usize, found: usize },
    #[error(transparent)]
    Label(#[from] LabelError),
}

/// In-memory dataset used for training and evaluation.
#[derive(Debug, Clone)]
pub struct TrainDataset {
    /// Number of `f32` values in each feature vector.
    pub n_features: usize,
    /// Ordered list of class names; labels index into it.
    pub classes: Vec<String>,
    /// Feature matrix, row-major.
    pub x: Vec<Vec<f32>>,
    /// Class indices aligned with `x`.
    pub y: Vec<usize>,
}

impl TrainDataset {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Check shape and label invariants before fitting.
    pub fn validate(&self) -> Result<(), TrainError> {
        if self.x.len() != self.y.len() {
            return Err(TrainError::LengthMismatch {
                rows: self.x.len(),
                labels: self.y.len(),
            });
        }
        if self.x.is_empty() {
            return Err(TrainError::Empty);
        }
        let n_classes = self.classes.len();
        if n_classes < 2 {
            return Err(TrainError::TooFewClasses(n_classes));
        }
        for (row, (features, &label)) in self.x.iter().zip(self.y.iter()).enumerate() {
            if features.len() != self.n_features {
                return Err(TrainError::RowWidth {
                    row,
                    found: features.len(),
                    expected: self.n_features,
                });
            }
            if label >= n_classes {
                return Err(TrainError::LabelOutOfRange {
                    row,
                    label,
                    n_classes,
                });
            }
        }
        Ok(())
    }

    /// Copy the rows at `indices` into a new dataset.
    pub fn subset(&self, indices: &[usize]) -> TrainDataset {
        TrainDataset {
            n_features: self.n_features,
            classes: self.classes.clone(),
            x: indices.iter().map(|&i| self.x[i].clone()).collect(),
            y: indices.iter().map(|&i| self.y[i]).collect(),
        }
    }
}

/// Common inference surface of the trained classifiers.
pub trait Classifier {
    /// Number of classes the model distinguishes.
    fn n_classes(&self) -> usize;

    /// Class probabilities for a feature vector.
    fn predict_proba(&self, features: &[f32]) -> Vec<f32>;

    /// Most probable class index; ties resolve to the lowest index.
    fn predict_class_index(&self, features: &[f32]) -> usize {
        argmax(&self.predict_proba(features))
    }
}

pub(crate) fn argmax(values: &[f32]) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f32::NEG_INFINITY;
    for (idx, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> TrainDataset {
        TrainDataset {
            n_features: 2,
            classes: vec!["a".into(), "b".into()],
            x: vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![2.0, 2.0]],
            y: vec![0, 1, 1],
        }
    }

    #[test]
    fn validate_accepts_consistent_dataset() {
        dataset().validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_shapes() {
        let mut short_row = dataset();
        short_row.x[1] = vec![1.0];
        assert!(matches!(
            short_row.validate(),
            Err(TrainError::RowWidth { row: 1, .. })
        ));

        let mut bad_label = dataset();
        bad_label.y[2] = 5;
        assert!(matches!(
            bad_label.validate(),
            Err(TrainError::LabelOutOfRange { label: 5, .. })
        ));

        let mut one_class = dataset();
        one_class.classes.truncate(1);
        assert!(matches!(one_class.validate(), Err(TrainError::TooFewClasses(1))));
    }

    #[test]
    fn subset_copies_selected_rows() {
        let sub = dataset().subset(&[2, 0]);
        assert_eq!(sub.x, vec![vec![2.0, 2.0], vec![0.0, 1.0]]);
        assert_eq!(sub.y, vec![1, 0]);
    }

    #[test]
    fn argmax_prefers_first_maximum() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(argmax(&[]), 0);
    }
}
