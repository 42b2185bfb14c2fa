//! egui front end for the lookup form.

/// Native message boxes.
pub mod dialogs;
/// Form rendering.
pub mod ui;
