//! Toolkit-independent state and actions behind the lookup form.

use crate::config::Settings;
use crate::dataset::lookup::ALL_COUNTRIES;
use crate::dataset::{AirQualityDataset, CountryFilter, DatasetError, LookupOutcome, load_dataset};
use crate::ml::artifact::{ArtifactError, ModelBundle};
use crate::report::AqiReport;

pub const EMPTY_CITY_MESSAGE: &str = "Please enter a city name.";
pub const OTHER_COUNTRY_TITLE: &str = "City Not Found in Selected Country";
/// Title of every error dialog the form raises.
pub const ERROR_TITLE: &str = "Error";

/// Modal dialogs the controller needs from the host UI.
pub trait Prompter {
    fn error(&mut self, title: &str, message: &str);
    /// Ask a yes/no question; `true` means yes.
    fn confirm(&mut self, title: &str, message: &str) -> bool;
}

/// What [`LookupForm::check_air_quality`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Shown,
    Rejected,
    Declined,
}

pub struct LookupForm {
    dataset: AirQualityDataset,
    bundle: ModelBundle,
    countries: Vec<String>,
    pub selected_country: String,
    pub city_input: String,
    report: Option<AqiReport>,
}

/// Load the model bundle and dataset named in `settings` and build the form.
///
/// A missing model or dataset file yields the "Required files" message; any
/// other load failure passes its own message through.
pub fn load_form(settings: &Settings) -> Result<LookupForm, String> {
    let missing = || {
        format!(
            "Required files ({} or {}) not found.",
            settings.model_path.display(),
            settings.dataset_path.display()
        )
    };
    let bundle = match ModelBundle::load(&settings.model_path) {
        Ok(bundle) => bundle,
        Err(ArtifactError::NotFound(_)) => return Err(missing()),
        Err(err) => return Err(err.to_string()),
    };
    let dataset = match load_dataset(&settings.dataset_path) {
        Ok(dataset) => dataset,
        Err(DatasetError::NotFound(_)) => return Err(missing()),
        Err(err) => return Err(err.to_string()),
    };
    Ok(LookupForm::new(dataset, bundle))
}

impl LookupForm {
    pub fn new(dataset: AirQualityDataset, bundle: ModelBundle) -> Self {
        let countries = std::iter::once(ALL_COUNTRIES.to_string())
            .chain(dataset.countries())
            .collect();
        Self {
            dataset,
            bundle,
            countries,
            selected_country: ALL_COUNTRIES.to_string(),
            city_input: String::new(),
            report: None,
        }
    }

    /// Dropdown entries, `All Countries` first.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Select the dropdown entry at `index`; out-of-range indices are ignored.
    pub fn select_country(&mut self, index: usize) {
        if let Some(country) = self.countries.get(index) {
            self.selected_country = country.clone();
        }
    }

    pub fn report(&self) -> Option<&AqiReport> {
        self.report.as_ref()
    }

    /// Look up the typed city under the selected country and show its report.
    pub fn check_air_quality(&mut self, prompter: &mut dyn Prompter) -> CheckOutcome {
        self.report = None;
        let city = self.city_input.trim().to_string();
        if city.is_empty() {
            prompter.error(ERROR_TITLE, EMPTY_CITY_MESSAGE);
            return CheckOutcome::Rejected;
        }

        let filter = CountryFilter::from_label(&self.selected_country);
        tracing::debug!("Looking up '{city}' in {}", filter.label());
        let record = match self.dataset.find_city(&city, &filter) {
            LookupOutcome::Found(record) => record,
            LookupOutcome::NotFound { city, suggestions } => {
                prompter.error(ERROR_TITLE, &not_found_message(&city, &suggestions));
                return CheckOutcome::Rejected;
            }
            LookupOutcome::InOtherCountry {
                city,
                requested,
                available,
            } => {
                let message = format!(
                    "The city '{city}' is not in '{requested}' but exists in '{available}'. \
                     Would you like to see results for this city in '{available}'?"
                );
                if !prompter.confirm(OTHER_COUNTRY_TITLE, &message) {
                    return CheckOutcome::Declined;
                }
                self.selected_country = available;
                return self.check_air_quality(prompter);
            }
        };

        match AqiReport::build(record, &city, &self.bundle) {
            Ok(report) => {
                self.report = Some(report);
                CheckOutcome::Shown
            }
            Err(err) => {
                tracing::warn!("Prediction failed for '{city}': {err}");
                prompter.error(
                    ERROR_TITLE,
                    &format!(
                        "Error accessing data for '{city}': {err}. \
                         The dataset may be corrupted or missing required columns."
                    ),
                );
                CheckOutcome::Rejected
            }
        }
    }
}

fn not_found_message(city: &str, suggestions: &[String]) -> String {
    let mut message = format!("No city named '{city}' exists in the dataset.");
    if !suggestions.is_empty() {
        message.push_str(&format!(" Did you mean: {}?", suggestions.join(", ")));
    }
    message
}
