//! Entry point for the air quality lookup form.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use std::process::ExitCode;

use airq::config;
use airq::egui_app::dialogs::show_error;
use airq::egui_app::ui::{AqiApp, INITIAL_WINDOW_SIZE, WINDOW_TITLE};
use airq::form::{self, ERROR_TITLE, LookupForm};
use airq::logging::{self, ConsoleTarget};

fn main() -> ExitCode {
    if let Err(err) = logging::init(ConsoleTarget::Stdout) {
        eprintln!("Logging disabled: {err}");
    }

    let form = match load_form() {
        Ok(form) => form,
        Err(message) => {
            tracing::error!("{message}");
            show_error(ERROR_TITLE, &message);
            return ExitCode::FAILURE;
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(INITIAL_WINDOW_SIZE),
        ..Default::default()
    };
    if let Err(err) = eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(move |_cc| Ok(Box::new(AqiApp::new(form)))),
    ) {
        eprintln!("Failed to start UI: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn load_form() -> Result<LookupForm, String> {
    let settings = config::load_or_default().map_err(|err| format!("Failed to load config: {err}"))?;
    form::load_form(&settings)
}
