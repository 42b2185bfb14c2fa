//! Answer whether a city or country is survivable based on its PM2.5 readings.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use airq::config;
use airq::dataset::load_dataset;
use airq::logging::{self, ConsoleTarget};
use airq::survival::{SurvivalOptions, answer_query, train_survival_model};

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
    let settings = config::load_or_default().map_err(|err| err.to_string())?;
    let dataset_path = options.dataset.unwrap_or(settings.dataset_path);
    let mut survival = SurvivalOptions::from(&settings.survival);
    if let Some(threshold) = options.threshold {
        survival.pm25_threshold = threshold;
    }

    let dataset = load_dataset(&dataset_path).map_err(|err| err.to_string())?;
    let model = train_survival_model(&dataset, &survival).map_err(|err| err.to_string())?;

    println!("=== Air Pollution Detection System ===");
    let query = match options.query {
        Some(query) => query,
        None => prompt("Enter a city or country name: ")?,
    };
    println!("{}", answer_query(&dataset, &model, &query));
    Ok(())
}

fn prompt(message: &str) -> Result<String, String> {
    let mut stdout = io::stdout();
    write!(stdout, "{message}")
        .and_then(|()| stdout.flush())
        .map_err(|err| format!("Failed to write prompt: {err}"))?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|err| format!("Failed to read input: {err}"))?;
    Ok(line)
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    dataset: Option<PathBuf>,
    query: Option<String>,
    threshold: Option<f32>,
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--dataset" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--dataset requires a value".to_string())?;
                options.dataset = Some(PathBuf::from(value));
            }
            "--query" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--query requires a value".to_string())?;
                options.query = Some(value.clone());
            }
            "--threshold" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--threshold requires a value".to_string())?;
                let threshold = value
                    .parse::<f32>()
                    .ok()
                    .filter(|t| t.is_finite())
                    .ok_or_else(|| format!("Invalid --threshold value: {value}"))?;
                options.threshold = Some(threshold);
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "airq-survival",
        "",
        "Trains a PM2.5 random forest and reports whether a city or country is survivable.",
        "",
        "Usage:",
        "  airq-survival [--dataset file.csv] [--query name] [--threshold aqi]",
        "",
        "Options:",
        "  --dataset <file>     Pollution CSV (default from config.toml).",
        "  --query <name>       City or country to check; prompts on stdin when omitted.",
        "  --threshold <f32>    PM2.5 AQI at which a place becomes not survivable (default: 100).",
    ]
    .join("\n")
}
