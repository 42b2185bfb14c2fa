//! Multi-pollutant AQI category training pipeline.
//!
//! Builds the `[CO, Ozone, NO2, PM2.5, Max]` feature matrix, cross-validates a
//! decision tree, fits it on a seeded 80/20 split and bundles the result with
//! its label encoder.

use crate::config::TrainingSettings;
use crate::dataset::AirQualityDataset;
use crate::features::{FEATURE_LEN, pearson_correlation};
use crate::ml::artifact::ModelBundle;
use crate::ml::metrics::{ConfusionMatrix, accuracy, classification_report, evaluate};
use crate::ml::split::{cross_val_scores, mean_std, train_test_split};
use crate::ml::tree::{TreeOptions, train_decision_tree};
use crate::ml::{LabelEncoder, TrainDataset, TrainError};

/// Parameters for [`train_aqi_model`].
#[derive(Debug, Clone)]
pub struct TrainingOptions {
    pub seed: u64,
    pub test_fraction: f64,
    pub cv_folds: usize,
    pub tree: TreeOptions,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self::from(&TrainingSettings::default())
    }
}

impl From<&TrainingSettings> for TrainingOptions {
    fn from(settings: &TrainingSettings) -> Self {
        Self {
            seed: settings.seed,
            test_fraction: settings.test_fraction,
            cv_folds: settings.cv_folds,
            tree: TreeOptions {
                max_depth: settings.max_depth_limit(),
                ..TreeOptions::default()
            },
        }
    }
}

/// Everything the training tool reports, plus the bundle to save.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    /// Pearson correlation between `AQI Value` and `PM2.5 AQI Value`.
    pub correlation: Option<f64>,
    /// Accuracy per cross-validation fold.
    pub cv_scores: Vec<f32>,
    pub cv_mean: f32,
    pub cv_std: f32,
    pub train_rows: usize,
    pub test_rows: usize,
    pub test_accuracy: f32,
    pub confusion: ConfusionMatrix,
    /// Per-class precision/recall/F1 table for the test split.
    pub report: String,
    pub bundle: ModelBundle,
}

/// Feature matrix and encoded labels for every dataset row.
pub fn build_training_set(
    dataset: &AirQualityDataset,
) -> Result<(TrainDataset, LabelEncoder), TrainError> {
    let encoder = LabelEncoder::fit(dataset.records().iter().map(|r| r.aqi_category.as_str()));
    let y = encoder.transform_all(dataset.records().iter().map(|r| r.aqi_category.as_str()))?;
    let x = dataset
        .records()
        .iter()
        .map(|record| record.pollutants.to_vector())
        .collect();
    let train = TrainDataset {
        n_features: FEATURE_LEN,
        classes: encoder.classes().to_vec(),
        x,
        y,
    };
    train.validate()?;
    Ok((train, encoder))
}

/// Train the AQI category tree and evaluate it.
pub fn train_aqi_model(
    dataset: &AirQualityDataset,
    options: &TrainingOptions,
) -> Result<TrainingSummary, TrainError> {
    let aqi: Vec<f32> = dataset.records().iter().map(|r| r.aqi_value).collect();
    let pm25: Vec<f32> = dataset.records().iter().map(|r| r.pollutants.pm25).collect();
    let correlation = pearson_correlation(&aqi, &pm25);

    let (full, encoder) = build_training_set(dataset)?;
    tracing::info!(
        "Training on {} rows across {} categories",
        full.len(),
        encoder.len()
    );

    let cv_scores = cross_val_scores(&full, options.cv_folds, |train| {
        train_decision_tree(train, &options.tree)
    })?;
    let (cv_mean, cv_std) = mean_std(&cv_scores);

    let split = train_test_split(full.len(), options.test_fraction, options.seed)?;
    let train = full.subset(&split.train);
    let test = full.subset(&split.test);
    let tree = train_decision_tree(&train, &options.tree)?;
    tracing::info!(
        "Fitted tree with depth {} and {} leaves",
        tree.depth(),
        tree.leaf_count()
    );

    let confusion = evaluate(&tree, &test);
    let test_accuracy = accuracy(&confusion);
    let report = classification_report(&confusion, encoder.classes());

    Ok(TrainingSummary {
        correlation,
        cv_scores,
        cv_mean,
        cv_std,
        train_rows: train.len(),
        test_rows: test.len(),
        test_accuracy,
        confusion,
        report,
        bundle: ModelBundle::new(tree, encoder),
    })
}
