//! The `doctor` command.
//!
//! Runs the preflight diagnostics and prints one line per check. Exits
//! non-zero when any check reports an error (warnings pass).

use std::path::{Path, PathBuf};

use crate::doctor::{run_diagnostics, DiagnosticStatus};
use crate::error::Result;
use crate::registry;
use crate::ui::Console;

use super::dispatcher::{Command, CommandResult};

/// The doctor command implementation.
pub struct DoctorCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
}

impl DoctorCommand {
    /// Create a new doctor command.
    pub fn new(project_root: &Path, config_path: Option<PathBuf>) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path,
        }
    }
}

impl Command for DoctorCommand {
    fn execute(&self, console: &Console) -> Result<CommandResult> {
        let config = super::load_config(&self.project_root, &self.config_path)?;

        console.message(&console.theme().format_header("kitforge doctor"));

        let diagnostics = run_diagnostics(&config, registry::all());
        let mut failed = false;

        for diagnostic in &diagnostics {
            let line = format!("{}: {}", diagnostic.name, diagnostic.detail);
            match diagnostic.status {
                DiagnosticStatus::Ok => console.success(&line),
                DiagnosticStatus::Warning => console.warning(&line),
                DiagnosticStatus::Error => {
                    console.error(&line);
                    failed = true;
                }
            }
        }

        if failed {
            Ok(CommandResult::failure(1))
        } else {
            Ok(CommandResult::success())
        }
    }
}
