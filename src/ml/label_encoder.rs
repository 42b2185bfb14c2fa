//! Mapping between category names and class indices.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("Unknown label '{0}'")]
    UnknownLabel(String),
    #[error("Class index {index} is out of range for {n_classes} classes")]
    IndexOutOfRange { index: usize, n_classes: usize },
    #[error("Encoder classes must be sorted and unique")]
    Unsorted,
}

/// Sorted table of class names; a label's index is its position in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learn the class table from every label in `labels`.
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes: BTreeSet<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_string())
            .collect();
        Self {
            classes: classes.into_iter().collect(),
        }
    }

    /// Rebuild an encoder from a stored class table.
    pub fn from_classes(classes: Vec<String>) -> Result<Self, LabelError> {
        let encoder = Self { classes };
        encoder.validate()?;
        Ok(encoder)
    }

    /// Check that the class table is strictly ascending.
    pub fn validate(&self) -> Result<(), LabelError> {
        if self.classes.windows(2).all(|pair| pair[0] < pair[1]) {
            Ok(())
        } else {
            Err(LabelError::Unsorted)
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn transform(&self, label: &str) -> Result<usize, LabelError> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(label))
            .map_err(|_| LabelError::UnknownLabel(label.to_string()))
    }

    pub fn transform_all<I, S>(&self, labels: I) -> Result<Vec<usize>, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels
            .into_iter()
            .map(|label| self.transform(label.as_ref()))
            .collect()
    }

    pub fn inverse_transform(&self, index: usize) -> Result<&str, LabelError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(LabelError::IndexOutOfRange {
                index,
                n_classes: self.classes.len(),
            })
    }
}
