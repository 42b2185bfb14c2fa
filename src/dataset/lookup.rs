//! City lookup with country disambiguation.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use std::collections::BTreeMap;

use super::{AirQualityDataset, AirQualityRecord};

/// Label of the dropdown entry that disables country filtering.
pub const ALL_COUNTRIES: &str = "All Countries";

/// Country restriction applied to a city lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryFilter {
    All,
    /// Exact country name as it appears in the dataset.
    Country(String),
}

impl CountryFilter {
    /// Map a dropdown label to a filter.
    pub fn from_label(label: &str) -> Self {
        if label.is_empty() || label == ALL_COUNTRIES {
            Self::All
        } else {
            Self::Country(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_COUNTRIES,
            Self::Country(name) => name,
        }
    }
}

/// Result of looking a city up in the dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome<'a> {
    /// First row matching the city (and country, when filtered).
    Found(&'a AirQualityRecord),
    /// The city exists, but not under the requested country.
    InOtherCountry {
        city: String,
        requested: String,
        available: String,
    },
    /// No row has this city name.
    NotFound {
        city: String,
        suggestions: Vec<String>,
    },
}

const MAX_SUGGESTIONS: usize = 3;

impl AirQualityDataset {
    /// Find the reading for `city`, honoring the country filter.
    pub fn find_city(&self, city: &str, filter: &CountryFilter) -> LookupOutcome<'_> {
        let city = city.trim();
        let mut matches = self.rows_for_city(city).peekable();
        let Some(&first) = matches.peek() else {
            return LookupOutcome::NotFound {
                city: city.to_string(),
                suggestions: self.suggest_cities(city, MAX_SUGGESTIONS),
            };
        };
        let requested = match filter {
            CountryFilter::All => return LookupOutcome::Found(first),
            CountryFilter::Country(name) => name,
        };

        let mut available = None;
        for record in matches {
            match record.country.as_deref() {
                Some(country) if country == requested => return LookupOutcome::Found(record),
                Some(country) if available.is_none() => available = Some(country.to_string()),
                _ => {}
            }
        }
        match available {
            Some(available) => LookupOutcome::InOtherCountry {
                city: city.to_string(),
                requested: requested.clone(),
                available,
            },
            None => LookupOutcome::NotFound {
                city: city.to_string(),
                suggestions: Vec::new(),
            },
        }
    }

    /// Closest city names to `query`, best first.
    pub fn suggest_cities(&self, query: &str, limit: usize) -> Vec<String> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }
        let matcher = SkimMatcherV2::default().ignore_case();
        let mut best: BTreeMap<String, i64> = BTreeMap::new();
        for record in self.records() {
            if let Some(score) = matcher.fuzzy_match(&record.city, query) {
                let entry = best.entry(record.city.clone()).or_insert(score);
                *entry = (*entry).max(score);
            }
        }
        let mut ranked: Vec<(String, i64)> = best.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.into_iter().take(limit).map(|(city, _)| city).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::PollutantFeatures;

    fn record(country: Option<&str>, city: &str, aqi: f32) -> AirQualityRecord {
        AirQualityRecord {
            country: country.map(str::to_string),
            city: city.to_string(),
            aqi_value: aqi,
            aqi_category: "Good".to_string(),
            pollutants: PollutantFeatures {
                co: 1.0,
                ozone: 20.0,
                no2: 2.0,
                pm25: aqi,
            },
        }
    }

    fn dataset() -> AirQualityDataset {
        AirQualityDataset::new(vec![
            record(Some("United States of America"), "Portland", 31.0),
            record(Some("Jamaica"), "Portland", 22.0),
            record(None, "Granville", 40.0),
            record(Some("France"), "Paris", 58.0),
            record(Some("Germany"), "Berlin", 44.0),
            record(Some("Germany"), "Bernau", 35.0),
        ])
    }

    #[test]
    fn exact_match_ignores_case_and_whitespace() {
        let data = dataset();
        let outcome = data.find_city("  pARIS ", &CountryFilter::All);
        assert!(matches!(outcome, LookupOutcome::Found(r) if r.city == "Paris"));
    }

    #[test]
    fn unfiltered_lookup_returns_first_row() {
        let data = dataset();
        let LookupOutcome::Found(found) = data.find_city("portland", &CountryFilter::All) else {
            panic!("expected a match");
        };
        assert_eq!(found.country_or_empty(), "United States of America");
    }

    #[test]
    fn country_filter_selects_matching_row() {
        let data = dataset();
        let filter = CountryFilter::Country("Jamaica".into());
        let LookupOutcome::Found(found) = data.find_city("Portland", &filter) else {
            panic!("expected a match");
        };
        assert_eq!(found.aqi_value, 22.0);
    }

    #[test]
    fn city_in_other_country_offers_disambiguation() {
        let data = dataset();
        let filter = CountryFilter::Country("Germany".into());
        assert_eq!(
            data.find_city("paris", &filter),
            LookupOutcome::InOtherCountry {
                city: "paris".into(),
                requested: "Germany".into(),
                available: "France".into(),
            }
        );
    }

    #[test]
    fn city_without_any_country_is_not_found_under_filter() {
        let data = dataset();
        let filter = CountryFilter::Country("Germany".into());
        assert!(matches!(
            data.find_city("Granville", &filter),
            LookupOutcome::NotFound { suggestions, .. } if suggestions.is_empty()
        ));
    }

    #[test]
    fn absent_city_is_not_found_with_suggestions() {
        let data = dataset();
        let LookupOutcome::NotFound { city, suggestions } =
            data.find_city("Bern", &CountryFilter::All)
        else {
            panic!("expected not found");
        };
        assert_eq!(city, "Bern");
        assert!(suggestions.contains(&"Berlin".to_string()));
        assert!(suggestions.contains(&"Bernau".to_string()));
        assert!(!suggestions.contains(&"Paris".to_string()));
    }

    #[test]
    fn countries_are_sorted_and_unique() {
        assert_eq!(
            dataset().countries(),
            vec!["France", "Germany", "Jamaica", "United States of America"]
        );
    }

    #[test]
    fn filter_labels_round_trip() {
        assert_eq!(CountryFilter::from_label(ALL_COUNTRIES), CountryFilter::All);
        let filter = CountryFilter::from_label("France");
        assert_eq!(filter.label(), "France");
    }
}
