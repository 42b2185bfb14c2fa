//! Seeded train/test splits and stratified k-fold cross-validation.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

use super::metrics::{ConfusionMatrix, accuracy};
use super::{Classifier, TrainDataset, TrainError};

/// Row indices of a train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_rows` with `seed` and hold out `ceil(n_rows * test_fraction)` rows.
///
/// Both sides always keep at least one row.
pub fn train_test_split(
    n_rows: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<SplitIndices, TrainError> {
    if n_rows < 2 {
        return Err(TrainError::TooFewRows {
            rows: n_rows,
            parts: 2,
        });
    }
    let fraction = if test_fraction.is_finite() {
        test_fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let test_n = ((n_rows as f64) * fraction).ceil() as usize;
    let test_n = test_n.clamp(1, n_rows - 1);

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let train = indices.split_off(test_n);
    Ok(SplitIndices {
        train,
        test: indices,
    })
}

/// Partition rows into `k` folds, dealing each class round-robin so every fold
/// sees a similar class mix. Fold sizes differ by at most one.
pub fn stratified_folds(y: &[usize], k: usize) -> Result<Vec<Vec<usize>>, TrainError> {
    if k < 2 || y.len() < k {
        return Err(TrainError::TooFewRows {
            rows: y.len(),
            parts: k,
        });
    }
    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, &label) in y.iter().enumerate() {
        by_class.entry(label).or_default().push(idx);
    }
    let mut folds = vec![Vec::new(); k];
    let mut position = 0usize;
    for rows in by_class.into_values() {
        for idx in rows {
            folds[position % k].push(idx);
            position += 1;
        }
    }
    for fold in &mut folds {
        fold.sort_unstable();
    }
    Ok(folds)
}

/// Accuracy of `fit` on each held-out fold of a stratified k-fold split.
pub fn cross_val_scores<M, F>(
    dataset: &TrainDataset,
    k: usize,
    mut fit: F,
) -> Result<Vec<f32>, TrainError>
where
    M: Classifier,
    F: FnMut(&TrainDataset) -> Result<M, TrainError>,
{
    dataset.validate()?;
    let folds = stratified_folds(&dataset.y, k)?;
    let mut scores = Vec::with_capacity(k);
    for (fold_idx, test_rows) in folds.iter().enumerate() {
        let train_rows: Vec<usize> = folds
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != fold_idx)
            .flat_map(|(_, rows)| rows.iter().copied())
            .collect();
        let model = fit(&dataset.subset(&train_rows))?;
        let mut cm = ConfusionMatrix::new(dataset.classes.len());
        for &row in test_rows {
            cm.add(dataset.y[row], model.predict_class_index(&dataset.x[row]));
        }
        scores.push(accuracy(&cm));
    }
    Ok(scores)
}

/// Mean and population standard deviation of a score list.
pub fn mean_std(scores: &[f32]) -> (f32, f32) {
    if scores.is_empty() {
        return (0.0, 0.0);
    }
    let n = scores.len() as f64;
    let mean = scores.iter().map(|&s| s as f64).sum::<f64>() / n;
    let var = scores
        .iter()
        .map(|&s| {
            let d = s as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean as f32, var.sqrt() as f32)
}
