//! Bagged ensemble of decision trees.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::tree::{DecisionTree, TreeOptions, grow_tree};
use super::{Classifier, TrainDataset, TrainError};

/// Training hyperparameters for a random forest.
#[derive(Debug, Clone)]
pub struct ForestOptions {
    /// Number of trees.
    pub n_trees: usize,
    /// Limits applied to every tree. `max_features: None` means `ceil(sqrt(n_features))`.
    pub tree: TreeOptions,
    /// Seed for bootstrap sampling and per-split feature sampling.
    pub seed: u64,
}

impl Default for ForestOptions {
    fn default() -> Self {
        Self {
            n_trees: 100,
            tree: TreeOptions::default(),
            seed: 42,
        }
    }
}

/// Random forest classifier; predictions average the trees' leaf distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub n_classes: usize,
    pub trees: Vec<DecisionTree>,
}

/// Fit a random forest on bootstrap samples of `dataset`.
pub fn train_random_forest(
    dataset: &TrainDataset,
    options: &ForestOptions,
) -> Result<RandomForest, TrainError> {
    dataset.validate()?;
    let n = dataset.len();
    let mut tree_options = options.tree.clone();
    if tree_options.max_features.is_none() {
        tree_options.max_features = Some(default_max_features(dataset.n_features));
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut trees = Vec::with_capacity(options.n_trees.max(1));
    for _ in 0..options.n_trees.max(1) {
        let bootstrap: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
        trees.push(grow_tree(dataset, bootstrap, &tree_options, Some(&mut rng)));
    }
    tracing::debug!("Trained random forest with {} trees on {n} rows", trees.len());

    Ok(RandomForest {
        n_features: dataset.n_features,
        n_classes: dataset.classes.len(),
        trees,
    })
}

fn default_max_features(n_features: usize) -> usize {
    ((n_features as f64).sqrt().ceil() as usize).max(1)
}

impl Classifier for RandomForest {
    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba(&self, features: &[f32]) -> Vec<f32> {
        let mut sum = vec![0.0f32; self.n_classes];
        if self.trees.is_empty() {
            return vec![1.0 / self.n_classes.max(1) as f32; self.n_classes];
        }
        for tree in &self.trees {
            for (acc, p) in sum.iter_mut().zip(tree.predict_proba(features)) {
                *acc += p;
            }
        }
        let count = self.trees.len() as f32;
        sum.iter_mut().for_each(|v| *v /= count);
        sum
    }
}
