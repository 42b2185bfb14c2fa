//! TOML settings shared by the form and the command-line tools.
//!
//! Config keys (TOML): `dataset_path`, `model_path`, `training.seed`,
//! `training.test_fraction`, `training.cv_folds`, `training.max_depth`,
//! `survival.pm25_threshold`, `survival.n_trees`, `survival.seed`,
//! `survival.test_fraction`.
//!
//! Relative paths resolve against the working directory of the process.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;

/// Default filename used to store the settings.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Dataset file read when no path is configured.
pub const DEFAULT_DATASET_PATH: &str = "global_air_pollution_dataset.csv";
/// Model artifact written by training and read by the form.
pub const DEFAULT_MODEL_PATH: &str = "air_pollution_model.json";

/// Errors that may occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No usable config directory found.
    #[error("No suitable config directory found")]
    NoConfigDir,
    /// Failed to create the config directory.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        /// Directory path that failed to create.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to read the config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to write the config file.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        /// TOML file path.
        path: PathBuf,
        /// TOML parse error.
        source: toml::de::Error,
    },
    /// Failed to serialize config to TOML.
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        /// TOML file path.
        path: PathBuf,
        /// TOML serialization error.
        source: toml::ser::Error,
    },
}

/// Top-level settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// CSV dataset path.
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
    /// Serialized model bundle path.
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default)]
    pub training: TrainingSettings,
    #[serde(default)]
    pub survival: SurvivalSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            model_path: default_model_path(),
            training: TrainingSettings::default(),
            survival: SurvivalSettings::default(),
        }
    }
}

/// Parameters for the multi-pollutant decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSettings {
    /// Seed for the train/test shuffle.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Share of rows held out for the test split.
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// Number of cross-validation folds.
    #[serde(default = "default_cv_folds")]
    pub cv_folds: usize,
    /// Maximum tree depth (0 = unlimited).
    #[serde(default)]
    pub max_depth: usize,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            test_fraction: default_test_fraction(),
            cv_folds: default_cv_folds(),
            max_depth: 0,
        }
    }
}

impl TrainingSettings {
    /// Depth limit as an option, mapping `0` to unlimited.
    pub fn max_depth_limit(&self) -> Option<usize> {
        (self.max_depth > 0).then_some(self.max_depth)
    }
}

/// Parameters for the PM2.5 survivability forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalSettings {
    /// PM2.5 AQI at or above which a location is labeled not survivable.
    #[serde(default = "default_pm25_threshold")]
    pub pm25_threshold: f32,
    /// Number of trees in the forest.
    #[serde(default = "default_n_trees")]
    pub n_trees: usize,
    /// Seed for bootstrapping and the train/test shuffle.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Share of rows held out for the test split.
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
}

impl Default for SurvivalSettings {
    fn default() -> Self {
        Self {
            pm25_threshold: default_pm25_threshold(),
            n_trees: default_n_trees(),
            seed: default_seed(),
            test_fraction: default_test_fraction(),
        }
    }
}

impl Settings {
    /// Clamp values into ranges the trainers accept.
    pub fn normalized(mut self) -> Self {
        self.training.test_fraction = clamp_fraction(self.training.test_fraction);
        self.training.cv_folds = self.training.cv_folds.max(2);
        self.survival.test_fraction = clamp_fraction(self.survival.test_fraction);
        self.survival.n_trees = self.survival.n_trees.max(1);
        if !self.survival.pm25_threshold.is_finite() {
            self.survival.pm25_threshold = default_pm25_threshold();
        }
        self
    }
}

fn clamp_fraction(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.05, 0.5)
    } else {
        default_test_fraction()
    }
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATASET_PATH)
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_PATH)
}

fn default_seed() -> u64 {
    42
}

fn default_test_fraction() -> f64 {
    0.2
}

fn default_cv_folds() -> usize {
    5
}

fn default_pm25_threshold() -> f32 {
    100.0
}

fn default_n_trees() -> usize {
    100
}

/// Resolve the settings file path inside the application directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load settings from the application directory, returning defaults if missing.
pub fn load_or_default() -> Result<Settings, ConfigError> {
    load_from_path(&config_path()?)
}

/// Load settings from a specific file, returning defaults if it does not exist.
pub fn load_from_path(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}; using defaults", path.display());
        return Ok(Settings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<Settings>(&text)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
        .map(Settings::normalized)
}

/// Save settings to a specific path, creating parent directories as needed.
pub fn save_to_path(settings: &Settings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let text = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}
