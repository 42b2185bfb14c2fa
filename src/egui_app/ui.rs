//! egui renderer for the lookup form.
use egui::{Color32, RichText, Ui};

use crate::category::Rgb;
use crate::egui_app::dialogs::RfdPrompter;
use crate::form::{LookupForm, Prompter};
use crate::report::AqiReport;

/// Window title shared by the native options and the form heading.
pub const WINDOW_TITLE: &str = "Air Pollution Detection System";
/// Initial inner size of the window.
pub const INITIAL_WINDOW_SIZE: [f32; 2] = [400.0, 400.0];

/// Renders the lookup form and forwards actions to [`LookupForm`].
pub struct AqiApp {
    form: LookupForm,
    prompter: Box<dyn Prompter>,
}

impl AqiApp {
    pub fn new(form: LookupForm) -> Self {
        Self {
            form,
            prompter: Box::new(RfdPrompter),
        }
    }

    fn render_inputs(&mut self, ui: &mut Ui) -> bool {
        let mut submit = false;
        egui::Grid::new("lookup_inputs")
            .num_columns(2)
            .spacing([8.0, 8.0])
            .show(ui, |ui| {
                ui.label("Select Country:");
                let form = &mut self.form;
                let mut clicked = None;
                egui::ComboBox::from_id_salt("country_combo")
                    .width(220.0)
                    .selected_text(form.selected_country.as_str())
                    .show_ui(ui, |ui| {
                        for (index, country) in form.countries().iter().enumerate() {
                            let selected = form.selected_country == *country;
                            if ui.selectable_label(selected, country.as_str()).clicked() {
                                clicked = Some(index);
                            }
                        }
                    });
                if let Some(index) = clicked {
                    form.select_country(index);
                }
                ui.end_row();

                ui.label("Enter City Name:");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.form.city_input).desired_width(220.0),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                ui.end_row();
            });
        ui.add_space(8.0);
        if ui.button("Check Air Quality").clicked() {
            submit = true;
        }
        submit
    }

    fn render_report(ui: &mut Ui, report: &AqiReport) {
        egui::Grid::new("aqi_report")
            .num_columns(2)
            .striped(true)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                for row in &report.rows {
                    ui.label(RichText::new(row.label).strong());
                    let value = RichText::new(&row.value);
                    let value = match row.highlight {
                        Some(background) => value
                            .background_color(to_color32(background))
                            .color(to_color32(background.contrasting_text())),
                        None => value,
                    };
                    ui.label(value);
                    ui.end_row();
                }
            });
    }
}

impl eframe::App for AqiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(WINDOW_TITLE);
            ui.add_space(8.0);
            if self.render_inputs(ui) {
                self.form.check_air_quality(self.prompter.as_mut());
            }
            ui.add_space(12.0);
            if let Some(report) = self.form.report() {
                egui::ScrollArea::vertical()
                    .id_salt("report_scroll")
                    .show(ui, |ui| Self::render_report(ui, report));
            }
        });
    }
}

fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}
