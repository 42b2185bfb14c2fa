//! PM2.5 survivability classifier and query answering.

use std::fmt;

use crate::config::SurvivalSettings;
use crate::dataset::{AirQualityDataset, AirQualityRecord};
use crate::ml::forest::{ForestOptions, RandomForest, train_random_forest};
use crate::ml::metrics::{accuracy, evaluate};
use crate::ml::split::train_test_split;
use crate::ml::{Classifier, TrainDataset, TrainError};

const CLASS_NAMES: [&str; 2] = ["survivable", "not survivable"];

/// Parameters for [`train_survival_model`].
#[derive(Debug, Clone)]
pub struct SurvivalOptions {
    /// PM2.5 AQI at or above which a place is labelled not survivable.
    pub pm25_threshold: f32,
    pub n_trees: usize,
    pub seed: u64,
    pub test_fraction: f64,
}

impl Default for SurvivalOptions {
    fn default() -> Self {
        Self::from(&SurvivalSettings::default())
    }
}

impl From<&SurvivalSettings> for SurvivalOptions {
    fn from(settings: &SurvivalSettings) -> Self {
        Self {
            pm25_threshold: settings.pm25_threshold,
            n_trees: settings.n_trees,
            seed: settings.seed,
            test_fraction: settings.test_fraction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurvivalStatus {
    Survivable,
    NotSurvivable,
}

impl SurvivalStatus {
    fn from_class(class_idx: usize) -> Self {
        if class_idx == 0 {
            Self::Survivable
        } else {
            Self::NotSurvivable
        }
    }
}

impl fmt::Display for SurvivalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Survivable => f.write_str("Survivable ✅"),
            Self::NotSurvivable => f.write_str("Not Survivable ❌"),
        }
    }
}

/// Random forest over the single PM2.5 feature.
#[derive(Debug, Clone)]
pub struct SurvivalModel {
    pub forest: RandomForest,
    pub threshold: f32,
    /// Accuracy on the held-out split.
    pub test_accuracy: f32,
}

impl SurvivalModel {
    pub fn status_for(&self, pm25: f32) -> SurvivalStatus {
        SurvivalStatus::from_class(self.forest.predict_class_index(&[pm25]))
    }
}

/// Rows that take part in survivability training and queries.
pub fn survival_rows(dataset: &AirQualityDataset) -> impl Iterator<Item = &AirQualityRecord> {
    dataset
        .records()
        .iter()
        .filter(|record| record.country.is_some())
}

/// Label every row with a country by its PM2.5 reading.
pub fn build_survival_set(dataset: &AirQualityDataset, threshold: f32) -> TrainDataset {
    let (x, y) = survival_rows(dataset)
        .map(|record| {
            let pm25 = record.pollutants.pm25;
            (vec![pm25], usize::from(pm25 >= threshold))
        })
        .unzip();
    TrainDataset {
        n_features: 1,
        classes: CLASS_NAMES.iter().map(|name| name.to_string()).collect(),
        x,
        y,
    }
}

/// Fit the survivability forest on a seeded split and score it on the rest.
pub fn train_survival_model(
    dataset: &AirQualityDataset,
    options: &SurvivalOptions,
) -> Result<SurvivalModel, TrainError> {
    let full = build_survival_set(dataset, options.pm25_threshold);
    full.validate()?;
    let split = train_test_split(full.len(), options.test_fraction, options.seed)?;
    let train = full.subset(&split.train);
    let test = full.subset(&split.test);

    let forest = train_random_forest(
        &train,
        &ForestOptions {
            n_trees: options.n_trees,
            seed: options.seed,
            ..ForestOptions::default()
        },
    )?;
    let test_accuracy = accuracy(&evaluate(&forest, &test));
    tracing::info!(
        "Survivability model trained on {} rows; test accuracy {:.4}",
        train.len(),
        test_accuracy
    );
    Ok(SurvivalModel {
        forest,
        threshold: options.pm25_threshold,
        test_accuracy,
    })
}

/// Answer to a city or country query.
#[derive(Debug, Clone, PartialEq)]
pub enum SurvivalAnswer {
    Country {
        name: String,
        average_pm25: f64,
        status: SurvivalStatus,
    },
    City {
        city: String,
        country: String,
        pm25: f32,
        status: SurvivalStatus,
    },
    NoData {
        query: String,
    },
}

impl fmt::Display for SurvivalAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Country {
                name,
                average_pm25,
                status,
            } => write!(
                f,
                "Country: {name} | Average PM2.5 AQI: {average_pm25:.2} | Prediction: {status}"
            ),
            Self::City {
                city,
                country,
                pm25,
                status,
            } => write!(
                f,
                "City: {city}, {country} | PM2.5 AQI: {pm25} | Prediction: {status}"
            ),
            Self::NoData { query } => write!(f, "No data found for '{query}'."),
        }
    }
}

/// Country names win over city names; cities resolve to their first row.
pub fn answer_query(
    dataset: &AirQualityDataset,
    model: &SurvivalModel,
    query: &str,
) -> SurvivalAnswer {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return SurvivalAnswer::NoData { query };
    }

    let mut country_name = None;
    let mut total = 0.0f64;
    let mut count = 0usize;
    for record in dataset.rows_for_country(&query) {
        country_name.get_or_insert_with(|| record.country_or_empty().to_string());
        total += f64::from(record.pollutants.pm25);
        count += 1;
    }
    if let Some(name) = country_name {
        let average_pm25 = total / count as f64;
        tracing::debug!("Country query '{query}' matched {count} rows");
        return SurvivalAnswer::Country {
            name,
            average_pm25,
            status: model.status_for(average_pm25 as f32),
        };
    }

    let city_row = dataset
        .rows_for_city(&query)
        .find(|record| record.country.is_some());
    match city_row {
        Some(record) => SurvivalAnswer::City {
            city: record.city.clone(),
            country: record.country_or_empty().to_string(),
            pm25: record.pollutants.pm25,
            status: model.status_for(record.pollutants.pm25),
        },
        None => SurvivalAnswer::NoData { query },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::PollutantFeatures;

    fn record(country: Option<&str>, city: &str, pm25: f32) -> AirQualityRecord {
        AirQualityRecord {
            country: country.map(str::to_string),
            city: city.to_string(),
            aqi_value: pm25,
            aqi_category: "Good".into(),
            pollutants: PollutantFeatures {
                co: 1.0,
                ozone: 10.0,
                no2: 1.0,
                pm25,
            },
        }
    }

    fn dataset() -> AirQualityDataset {
        let mut records = Vec::new();
        for i in 0..40 {
            records.push(record(Some("Cleanland"), &format!("Fresh {i}"), 10.0 + i as f32));
            records.push(record(Some("Smogland"), &format!("Haze {i}"), 150.0 + i as f32));
        }
        records.push(record(None, "Nowhere", 500.0));
        records.push(record(Some("Cleanland"), "Twin", 20.0));
        records.push(record(Some("Smogland"), "Twin", 300.0));
        AirQualityDataset::new(records)
    }

    fn model(dataset: &AirQualityDataset) -> SurvivalModel {
        let options = SurvivalOptions {
            n_trees: 20,
            ..SurvivalOptions::default()
        };
        train_survival_model(dataset, &options).unwrap()
    }

    #[test]
    fn labels_use_threshold_and_skip_countryless_rows() {
        let set = build_survival_set(&dataset(), 100.0);
        assert_eq!(set.len(), 82);
        assert!(set.x.iter().all(|row| row[0] != 500.0));
        assert_eq!(set.y[0], 0);
        assert_eq!(set.y[1], 1);
    }

    #[test]
    fn forest_separates_clean_and_polluted_readings() {
        let data = dataset();
        let model = model(&data);
        assert!(model.test_accuracy > 0.9);
        assert_eq!(model.status_for(15.0), SurvivalStatus::Survivable);
        assert_eq!(model.status_for(250.0), SurvivalStatus::NotSurvivable);
    }

    #[test]
    fn country_query_uses_mean_pm25() {
        let data = dataset();
        let answer = answer_query(&data, &model(&data), "  CLEANLAND ");
        let SurvivalAnswer::Country {
            name,
            average_pm25,
            status,
        } = &answer
        else {
            panic!("expected country answer, got {answer:?}");
        };
        assert_eq!(name, "Cleanland");
        // (10 + ... + 49 + 20) / 41
        assert!((average_pm25 - 1200.0 / 41.0).abs() < 1e-6);
        assert_eq!(*status, SurvivalStatus::Survivable);
        assert!(answer.to_string().starts_with("Country: Cleanland | Average PM2.5 AQI: 29.27"));
    }

    #[test]
    fn city_query_uses_first_row() {
        let data = dataset();
        let answer = answer_query(&data, &model(&data), "twin");
        assert_eq!(
            answer.to_string(),
            "City: Twin, Cleanland | PM2.5 AQI: 20 | Prediction: Survivable ✅"
        );
    }

    #[test]
    fn unknown_and_countryless_queries_have_no_data() {
        let data = dataset();
        let model = model(&data);
        assert_eq!(
            answer_query(&data, &model, " Atlantis ").to_string(),
            "No data found for 'atlantis'."
        );
        assert!(matches!(
            answer_query(&data, &model, "nowhere"),
            SurvivalAnswer::NoData { .. }
        ));
    }

    #[test]
    fn status_text_matches_cli_output() {
        assert_eq!(SurvivalStatus::Survivable.to_string(), "Survivable ✅");
        assert_eq!(SurvivalStatus::NotSurvivable.to_string(), "Not Survivable ❌");
    }
}
