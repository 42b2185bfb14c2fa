//! In-memory pollution dataset and city lookup.
//!
//! The CSV is loaded fresh per process and never written back.

pub mod loader;
pub mod lookup;
pub mod record;

pub use loader::{DatasetError, load_dataset, load_dataset_from_reader};
pub use lookup::{CountryFilter, LookupOutcome};
pub use record::AirQualityRecord;

use std::collections::BTreeSet;

/// Read-only table of readings in file order.
#[derive(Debug, Clone)]
pub struct AirQualityDataset {
    records: Vec<AirQualityRecord>,
}

impl AirQualityDataset {
    pub fn new(records: Vec<AirQualityRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[AirQualityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted, de-duplicated list of countries present in the dataset.
    pub fn countries(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|record| record.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows whose city matches `city` case-insensitively, in file order.
    pub fn rows_for_city<'a>(
        &'a self,
        city: &str,
    ) -> impl Iterator<Item = &'a AirQualityRecord> + use<'a> {
        let needle = city.trim().to_lowercase();
        self.records
            .iter()
            .filter(move |record| record.city.to_lowercase() == needle)
    }

    /// Rows whose country matches `country` case-insensitively, in file order.
    pub fn rows_for_country<'a>(
        &'a self,
        country: &str,
    ) -> impl Iterator<Item = &'a AirQualityRecord> + use<'a> {
        let needle = country.trim().to_lowercase();
        self.records.iter().filter(move |record| {
            record
                .country
                .as_deref()
                .is_some_and(|name| name.to_lowercase() == needle)
        })
    }
}
