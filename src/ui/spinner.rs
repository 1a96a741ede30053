//! Progress spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::theme::KitforgeTheme;

/// A progress spinner for long-running operations (bundling, mostly).
pub struct ProgressSpinner {
    bar: ProgressBar,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar }
    }

    /// Create a spinner that doesn't show (for quiet/non-TTY modes).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Update the spinner message.
    pub fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    /// Finish the spinner with a success line.
    pub fn finish_success(&mut self, msg: &str) {
        let theme = KitforgeTheme::new();
        self.bar
            .set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        self.bar.finish_with_message(theme.format_success(msg));
    }

    /// Finish the spinner with an error line.
    pub fn finish_error(&mut self, msg: &str) {
        let theme = KitforgeTheme::new();
        self.bar
            .set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        self.bar.finish_with_message(theme.format_error(msg));
    }

    /// Finish the spinner with a warning line.
    pub fn finish_warning(&mut self, msg: &str) {
        let theme = KitforgeTheme::new();
        self.bar
            .set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        self.bar.finish_with_message(theme.format_warning(msg));
    }

    /// Clear the spinner without printing a final line.
    pub fn clear(&mut self) {
        self.bar.finish_and_clear();
    }
}
