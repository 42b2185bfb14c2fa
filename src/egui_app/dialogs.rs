//! Native dialogs backed by `rfd`.

use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::form::Prompter;

/// Shows blocking native message boxes.
#[derive(Debug, Default, Clone, Copy)]
pub struct RfdPrompter;

impl Prompter for RfdPrompter {
    fn error(&mut self, title: &str, message: &str) {
        show_error(title, message);
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        matches!(
            MessageDialog::new()
                .set_level(MessageLevel::Warning)
                .set_title(title)
                .set_description(message)
                .set_buttons(MessageButtons::YesNo)
                .show(),
            MessageDialogResult::Yes
        )
    }
}

/// Blocking error box with a single OK button.
pub fn show_error(title: &str, message: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
