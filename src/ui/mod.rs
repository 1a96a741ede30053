//! Terminal output components.
//!
//! This module provides:
//! - [`Console`] - mode-aware message printing with a styled theme
//! - [`ProgressSpinner`] - indicatif spinner for the long bundle stage
//! - [`OutputMode`] - verbosity gating
//! - [`format_duration`] - human-readable durations

pub mod output;
pub mod spinner;
pub mod theme;

pub use output::OutputMode;
pub use spinner::ProgressSpinner;
pub use theme::{should_use_colors, KitforgeTheme};

use std::time::Duration;

/// Mode-aware console output with a shared theme.
pub struct Console {
    mode: OutputMode,
    theme: KitforgeTheme,
    interactive: bool,
}

impl Console {
    /// Create a console for the given mode, with colors when appropriate.
    pub fn new(mode: OutputMode) -> Self {
        let colors = should_use_colors();
        Self {
            mode,
            theme: if colors {
                KitforgeTheme::new()
            } else {
                KitforgeTheme::plain()
            },
            interactive: console::Term::stdout().is_term(),
        }
    }

    /// The active theme.
    pub fn theme(&self) -> &KitforgeTheme {
        &self.theme
    }

    /// The active output mode.
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Print a status message (suppressed in quiet mode).
    pub fn message(&self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    /// Print a success message (suppressed in quiet mode).
    pub fn success(&self, msg: &str) {
        self.message(&self.theme.format_success(msg));
    }

    /// Print a warning message (suppressed in quiet mode).
    pub fn warning(&self, msg: &str) {
        self.message(&self.theme.format_warning(msg));
    }

    /// Print an error message to stderr (never suppressed).
    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    /// Check if stdout is an interactive terminal.
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Start a spinner, or a hidden one when the mode or terminal doesn't
    /// support live progress.
    pub fn spinner(&self, msg: &str) -> ProgressSpinner {
        if self.interactive && self.mode.shows_spinners() {
            ProgressSpinner::new(msg)
        } else {
            ProgressSpinner::hidden()
        }
    }
}

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}
