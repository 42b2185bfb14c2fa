//! Result table shown under the lookup form.

use crate::category::{Rgb, category_color};
use crate::dataset::AirQualityRecord;
use crate::ml::PredictError;
use crate::ml::artifact::ModelBundle;

/// One label/value line of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub label: &'static str,
    pub value: String,
    /// Background color for category rows.
    pub highlight: Option<Rgb>,
}

impl ReportRow {
    fn plain(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            highlight: None,
        }
    }

    fn category(label: &'static str, category: &str) -> Self {
        Self {
            label,
            value: category.to_string(),
            highlight: Some(category_color(category)),
        }
    }
}

/// Air quality details for one city, including the model's prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct AqiReport {
    pub rows: Vec<ReportRow>,
}

impl AqiReport {
    /// Build the report for `record`; `city_display` is the city as the user typed it.
    pub fn build(
        record: &AirQualityRecord,
        city_display: &str,
        bundle: &ModelBundle,
    ) -> Result<Self, PredictError> {
        let predicted = bundle.predict_category(&record.pollutants)?;
        let pollutants = &record.pollutants;
        let rows = vec![
            ReportRow::plain("City", city_display.to_string()),
            ReportRow::plain("Country", record.country_or_empty().to_string()),
            ReportRow::plain("AQI Value", format!("{:.2}", record.aqi_value)),
            ReportRow::category("AQI Category (Dataset)", &record.aqi_category),
            ReportRow::category("AQI Category (Predicted)", predicted),
            ReportRow::plain("CO AQI Value", format!("{:.2}", pollutants.co)),
            ReportRow::plain("Ozone AQI Value", format!("{:.2}", pollutants.ozone)),
            ReportRow::plain("NO2 AQI Value", format!("{:.2}", pollutants.no2)),
            ReportRow::plain("PM2.5 AQI Value", format!("{:.2}", pollutants.pm25)),
        ];
        Ok(Self { rows })
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::PollutantFeatures;
    use crate::ml::LabelEncoder;
    use crate::ml::tree::{DecisionTree, TreeNode};

    fn bundle() -> ModelBundle {
        let tree = DecisionTree {
            n_features: 5,
            n_classes: 2,
            nodes: vec![
                TreeNode::Split {
                    feature_index: 4,
                    threshold: 50.5,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf {
                    distribution: vec![1.0, 0.0],
                },
                TreeNode::Leaf {
                    distribution: vec![0.0, 1.0],
                },
            ],
        };
        ModelBundle::new(tree, LabelEncoder::fit(["Good", "Moderate"]))
    }

    fn record() -> AirQualityRecord {
        AirQualityRecord {
            country: Some("India".into()),
            city: "Delhi".into(),
            aqi_value: 66.0,
            aqi_category: "Moderate".into(),
            pollutants: PollutantFeatures {
                co: 1.0,
                ozone: 10.0,
                no2: 3.5,
                pm25: 66.0,
            },
        }
    }

    #[test]
    fn rows_follow_display_order() {
        let report = AqiReport::build(&record(), "delhi", &bundle()).unwrap();
        let labels: Vec<_> = report.rows.iter().map(|row| row.label).collect();
        assert_eq!(
            labels,
            [
                "City",
                "Country",
                "AQI Value",
                "AQI Category (Dataset)",
                "AQI Category (Predicted)",
                "CO AQI Value",
                "Ozone AQI Value",
                "NO2 AQI Value",
                "PM2.5 AQI Value",
            ]
        );
        assert_eq!(report.value("City"), Some("delhi"));
        assert_eq!(report.value("AQI Value"), Some("66.00"));
        assert_eq!(report.value("NO2 AQI Value"), Some("3.50"));
        assert_eq!(report.value("AQI Category (Predicted)"), Some("Moderate"));
    }

    #[test]
    fn only_category_rows_are_highlighted() {
        let report = AqiReport::build(&record(), "Delhi", &bundle()).unwrap();
        let highlighted: Vec<_> = report
            .rows
            .iter()
            .filter_map(|row| row.highlight.map(|color| (row.label, color.hex())))
            .collect();
        assert_eq!(
            highlighted,
            [
                ("AQI Category (Dataset)", "#FFFF00".to_string()),
                ("AQI Category (Predicted)", "#FFFF00".to_string()),
            ]
        );
    }

    #[test]
    fn missing_country_renders_empty() {
        let mut row = record();
        row.country = None;
        let report = AqiReport::build(&row, "Delhi", &bundle()).unwrap();
        assert_eq!(report.value("Country"), Some(""));
    }
}
