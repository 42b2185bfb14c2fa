//! Library exports for reuse in the binaries, benchmarks and tests.
/// Application directory resolution.
pub mod app_dirs;
/// AQI category color palette.
pub mod category;
/// Persistent settings.
pub mod config;
/// Pollution CSV loading and city lookup.
pub mod dataset;
/// egui front end.
pub mod egui_app;
/// Pollutant feature vectors.
pub mod features;
/// Lookup form controller.
pub mod form;
/// Tracing setup.
pub mod logging;
/// Classifiers, splits and metrics.
pub mod ml;
/// Result rows shown by the form.
pub mod report;
/// PM2.5 survivability model.
pub mod survival;
/// AQI category training pipeline.
pub mod training;
