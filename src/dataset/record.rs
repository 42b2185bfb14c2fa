use serde::Deserialize;

use crate::features::PollutantFeatures;

/// Header names the loader requires in the CSV.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Country",
    "City",
    "AQI Value",
    "AQI Category",
    "CO AQI Value",
    "Ozone AQI Value",
    "NO2 AQI Value",
    "PM2.5 AQI Value",
];

/// One row of the pollution dataset after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityRecord {
    /// Country name; some rows in the public dataset leave it blank.
    pub country: Option<String>,
    pub city: String,
    /// Overall AQI (the maximum of the pollutant sub-indices in practice).
    pub aqi_value: f32,
    /// Human-readable category such as `Good` or `Moderate`.
    pub aqi_category: String,
    pub pollutants: PollutantFeatures,
}

impl AirQualityRecord {
    /// Country name or an empty string when the row has none.
    pub fn country_or_empty(&self) -> &str {
        self.country.as_deref().unwrap_or("")
    }
}

/// Raw CSV row; numeric columns coerce unparseable cells to `None`.
#[derive(Debug, Deserialize)]
pub(super) struct RawRecord {
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "City")]
    city: Option<String>,
    #[serde(rename = "AQI Value", deserialize_with = "csv::invalid_option")]
    aqi_value: Option<f32>,
    #[serde(rename = "AQI Category")]
    aqi_category: Option<String>,
    #[serde(rename = "CO AQI Value", deserialize_with = "csv::invalid_option")]
    co: Option<f32>,
    #[serde(rename = "Ozone AQI Value", deserialize_with = "csv::invalid_option")]
    ozone: Option<f32>,
    #[serde(rename = "NO2 AQI Value", deserialize_with = "csv::invalid_option")]
    no2: Option<f32>,
    #[serde(rename = "PM2.5 AQI Value", deserialize_with = "csv::invalid_option")]
    pm25: Option<f32>,
}

impl RawRecord {
    /// Convert into a validated record, or `None` when a required cell is blank.
    pub(super) fn into_record(self) -> Option<AirQualityRecord> {
        let city = non_empty(self.city)?;
        let aqi_category = non_empty(self.aqi_category)?;
        let values = [self.aqi_value?, self.co?, self.ozone?, self.no2?, self.pm25?];
        if values.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(AirQualityRecord {
            country: non_empty(self.country),
            city,
            aqi_value: values[0],
            aqi_category,
            pollutants: PollutantFeatures {
                co: values[1],
                ozone: values[2],
                no2: values[3],
                pm25: values[4],
            },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
