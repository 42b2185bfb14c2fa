//! Train the AQI category model and export it as a JSON bundle.

use std::path::PathBuf;

use airq::config::{self, Settings};
use airq::dataset::load_dataset;
use airq::logging::{self, ConsoleTarget};
use airq::ml::metrics::format_confusion_matrix;
use airq::training::{TrainingOptions, train_aqi_model};

fn main() {
    if let Err(err) = logging::init(ConsoleTarget::Stderr) {
        eprintln!("Logging disabled: {err}");
    }
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    let settings = options.resolve_settings()?;

    let dataset = load_dataset(&settings.dataset_path).map_err(|err| err.to_string())?;
    let training = TrainingOptions::from(&settings.training);
    let summary = train_aqi_model(&dataset, &training).map_err(|err| err.to_string())?;

    match summary.correlation {
        Some(correlation) => println!(
            "Correlation between AQI Value and PM2.5 AQI Value: {correlation:.4}"
        ),
        None => println!("Correlation between AQI Value and PM2.5 AQI Value: undefined"),
    }
    let scores: Vec<String> = summary
        .cv_scores
        .iter()
        .map(|score| format!("{score:.4}"))
        .collect();
    println!("Cross-Validation Accuracy Scores: [{}]", scores.join(", "));
    println!(
        "Mean CV Accuracy: {:.4} (+/- {:.4})",
        summary.cv_mean,
        summary.cv_std * 2.0
    );
    println!("Test Set Accuracy: {:.4}", summary.test_accuracy);
    println!("Classification Report:");
    println!("{}", summary.report);
    println!("Confusion matrix (rows=true, cols=pred):");
    print!("{}", format_confusion_matrix(&summary.confusion));

    summary
        .bundle
        .save(&settings.model_path)
        .map_err(|err| err.to_string())?;
    println!(
        "Model and label encoder saved to {}",
        settings.model_path.display()
    );
    Ok(())
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    config: Option<PathBuf>,
    dataset: Option<PathBuf>,
    model_out: Option<PathBuf>,
    seed: Option<u64>,
    test_fraction: Option<f64>,
    folds: Option<usize>,
    max_depth: Option<usize>,
}

impl CliOptions {
    /// Config file values with command-line overrides applied.
    fn resolve_settings(&self) -> Result<Settings, String> {
        let mut settings = match &self.config {
            Some(path) => config::load_from_path(path),
            None => config::load_or_default(),
        }
        .map_err(|err| err.to_string())?;
        if let Some(path) = &self.dataset {
            settings.dataset_path = path.clone();
        }
        if let Some(path) = &self.model_out {
            settings.model_path = path.clone();
        }
        if let Some(seed) = self.seed {
            settings.training.seed = seed;
        }
        if let Some(fraction) = self.test_fraction {
            settings.training.test_fraction = fraction;
        }
        if let Some(folds) = self.folds {
            settings.training.cv_folds = folds;
        }
        if let Some(depth) = self.max_depth {
            settings.training.max_depth = depth;
        }
        Ok(settings.normalized())
    }
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        match flag {
            "-h" | "--help" => return Err(help_text()),
            "--config" => options.config = Some(PathBuf::from(take_value(&args, &mut idx, flag)?)),
            "--dataset" => options.dataset = Some(PathBuf::from(take_value(&args, &mut idx, flag)?)),
            "--out" => options.model_out = Some(PathBuf::from(take_value(&args, &mut idx, flag)?)),
            "--seed" => options.seed = Some(parse_value(&args, &mut idx, flag)?),
            "--test-fraction" => options.test_fraction = Some(parse_value(&args, &mut idx, flag)?),
            "--folds" => options.folds = Some(parse_value(&args, &mut idx, flag)?),
            "--max-depth" => options.max_depth = Some(parse_value(&args, &mut idx, flag)?),
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(options)
}

fn take_value<'a>(args: &'a [String], idx: &mut usize, flag: &str) -> Result<&'a str, String> {
    *idx += 1;
    args.get(*idx)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_value<T: std::str::FromStr>(
    args: &[String],
    idx: &mut usize,
    flag: &str,
) -> Result<T, String> {
    let value = take_value(args, idx, flag)?;
    value
        .parse::<T>()
        .map_err(|_| format!("Invalid {flag} value: {value}"))
}

fn help_text() -> String {
    [
        "airq-train",
        "",
        "Trains the AQI category decision tree and saves it with its label encoder.",
        "",
        "Usage:",
        "  airq-train [--dataset file.csv] [--out model.json] [options]",
        "",
        "Options:",
        "  --config <file>         Settings file (default: <config dir>/.airq/config.toml).",
        "  --dataset <file>        Pollution CSV (default: global_air_pollution_dataset.csv).",
        "  --out <file>            Output model path (default: air_pollution_model.json).",
        "  --seed <n>              Shuffle seed for the train/test split (default: 42).",
        "  --test-fraction <f64>   Held-out fraction (default: 0.2).",
        "  --folds <n>             Cross-validation folds (default: 5).",
        "  --max-depth <n>         Tree depth limit, 0 for unlimited (default: 0).",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_overrides() {
        let options = parse_args(args(&[
            "--dataset",
            "data.csv",
            "--out",
            "out/model.json",
            "--seed",
            "7",
            "--test-fraction",
            "0.25",
            "--folds",
            "3",
            "--max-depth",
            "4",
        ]))
        .unwrap();
        assert_eq!(options.dataset, Some(PathBuf::from("data.csv")));
        assert_eq!(options.model_out, Some(PathBuf::from("out/model.json")));
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.test_fraction, Some(0.25));
        assert_eq!(options.folds, Some(3));
        assert_eq!(options.max_depth, Some(4));
    }

    #[test]
    fn rejects_bad_values_and_unknown_flags() {
        assert_eq!(
            parse_args(args(&["--folds", "many"])).unwrap_err(),
            "Invalid --folds value: many"
        );
        assert_eq!(
            parse_args(args(&["--seed"])).unwrap_err(),
            "--seed requires a value"
        );
        assert!(parse_args(args(&["--bogus"])).unwrap_err().starts_with("Unknown argument: --bogus"));
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "dataset_path = \"from_config.csv\"\n[training]\nseed = 9\n").unwrap();
        let options = CliOptions {
            config: Some(path),
            seed: Some(3),
            ..CliOptions::default()
        };
        let settings = options.resolve_settings().unwrap();
        assert_eq!(settings.dataset_path, PathBuf::from("from_config.csv"));
        assert_eq!(settings.training.seed, 3);
        assert_eq!(settings.training.cv_folds, 5);
    }
}
