//! CSV loader for the global air pollution dataset.

use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::AirQualityDataset;
use super::record::{RawRecord, REQUIRED_COLUMNS};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset not found: {0}")]
    NotFound(PathBuf),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("dataset has no usable rows")]
    Empty,
}

/// Load the dataset from a CSV file on disk.
pub fn load_dataset(path: &Path) -> Result<AirQualityDataset, DatasetError> {
    if !path.is_file() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let dataset = read_records(reader)?;
    tracing::info!(
        "Loaded {} rows ({} countries) from {}",
        dataset.len(),
        dataset.countries().len(),
        path.display()
    );
    Ok(dataset)
}

/// Load the dataset from any CSV byte stream.
pub fn load_dataset_from_reader<R: Read>(input: R) -> Result<AirQualityDataset, DatasetError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    read_records(reader)
}

fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<AirQualityDataset, DatasetError> {
    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(DatasetError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.deserialize::<RawRecord>() {
        match row?.into_record() {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::warn!("Skipped {skipped} rows with blank city, category, or AQI values");
    }
    if records.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(AirQualityDataset::new(records))
}
