mod support;

use airq::config;
use airq::dataset::load_dataset;
use airq::form::{CheckOutcome, LookupForm, Prompter};
use airq::ml::artifact::ModelBundle;
use airq::training::{TrainingOptions, train_aqi_model};
use support::airq_env::{AirqEnvGuard, write_dataset};
use tempfile::tempdir;

#[derive(Default)]
struct RecordingPrompter {
    accept: bool,
    messages: Vec<String>,
}

impl Prompter for RecordingPrompter {
    fn error(&mut self, _title: &str, message: &str) {
        self.messages.push(message.to_string());
    }

    fn confirm(&mut self, _title: &str, message: &str) -> bool {
        self.messages.push(message.to_string());
        self.accept
    }
}

#[test]
fn trained_bundle_drives_form_lookups() {
    let dir = tempdir().unwrap();
    let _env = AirqEnvGuard::set_config_home(dir.path().join("config_home"));
    let dataset_path = write_dataset(dir.path());
    let model_path = dir.path().join("models").join("air_pollution_model.json");

    let mut settings = config::load_or_default().unwrap();
    settings.dataset_path = dataset_path;
    settings.model_path = model_path;
    config::save_to_path(&settings, &config::config_path().unwrap()).unwrap();
    let settings = config::load_or_default().unwrap();
    assert!(settings.model_path.ends_with("models/air_pollution_model.json"));

    let dataset = load_dataset(&settings.dataset_path).unwrap();
    assert_eq!(dataset.len(), 205);
    let summary = train_aqi_model(&dataset, &TrainingOptions::from(&settings.training)).unwrap();
    assert_eq!(summary.cv_scores.len(), 5);
    assert_eq!(summary.test_rows, 41);
    assert!(summary.test_accuracy > 0.8);
    summary.bundle.save(&settings.model_path).unwrap();

    let bundle = ModelBundle::load(&settings.model_path).unwrap();
    assert_eq!(
        bundle.label_encoder.classes(),
        ["Good", "Moderate", "Unhealthy", "Unhealthy for Sensitive Groups"]
    );

    let mut form = LookupForm::new(dataset, bundle);
    let mut prompter = RecordingPrompter {
        accept: true,
        ..RecordingPrompter::default()
    };

    form.city_input = "DELHI".into();
    assert_eq!(form.check_air_quality(&mut prompter), CheckOutcome::Shown);
    let report = form.report().unwrap();
    assert_eq!(report.value("City"), Some("DELHI"));
    assert_eq!(report.value("Country"), Some("India"));
    assert_eq!(report.value("AQI Value"), Some("180.00"));
    assert_eq!(report.value("AQI Category (Dataset)"), Some("Unhealthy"));

    form.selected_country = "India".into();
    form.city_input = "Paris".into();
    assert_eq!(form.check_air_quality(&mut prompter), CheckOutcome::Shown);
    assert_eq!(form.selected_country, "France");
    assert_eq!(form.report().unwrap().value("PM2.5 AQI Value"), Some("42.00"));

    form.city_input = "Atlantis".into();
    assert_eq!(form.check_air_quality(&mut prompter), CheckOutcome::Rejected);
    assert!(form.report().is_none());
    assert!(
        prompter
            .messages
            .last()
            .unwrap()
            .starts_with("No city named 'Atlantis' exists in the dataset.")
    );
}

#[test]
fn predictions_map_back_to_category_names() {
    let dir = tempdir().unwrap();
    let dataset = load_dataset(&write_dataset(dir.path())).unwrap();
    let summary = train_aqi_model(&dataset, &TrainingOptions::default()).unwrap();
    let path = dir.path().join("model.json");
    summary.bundle.save(&path).unwrap();
    let bundle = ModelBundle::load(&path).unwrap();

    for record in dataset.records() {
        let predicted = bundle.predict_category(&record.pollutants).unwrap();
        assert!(bundle.label_encoder.classes().iter().any(|c| c == predicted));
        assert_eq!(
            predicted,
            summary.bundle.predict_category(&record.pollutants).unwrap()
        );
    }
}
