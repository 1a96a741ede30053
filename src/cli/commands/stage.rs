//! Single-stage subcommands.
//!
//! `clean`, `bundle`, `convert`, `tidy`, and `register` run exactly one
//! pipeline stage, for one template or for all of them. They exist for
//! debugging a broken build; each is idempotent to re-run. Unlike the
//! aggregate `build` command, a stage failure here is surfaced directly.

use std::path::{Path, PathBuf};

use crate::bundler::EsbuildBundler;
use crate::cli::args::TemplateArgs;
use crate::error::Result;
use crate::pipeline::{Pipeline, Stage};
use crate::ui::Console;

use super::dispatcher::{Command, CommandResult};

/// Runs one pipeline stage across the selected templates.
pub struct StageCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    stage: Stage,
    args: TemplateArgs,
}

impl StageCommand {
    /// Create a new stage command.
    pub fn new(
        project_root: &Path,
        config_path: Option<PathBuf>,
        stage: Stage,
        args: TemplateArgs,
    ) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path,
            stage,
            args,
        }
    }
}

impl Command for StageCommand {
    fn execute(&self, console: &Console) -> Result<CommandResult> {
        let config = super::load_config(&self.project_root, &self.config_path)?;
        let templates = super::select_templates(&self.args.template)?;

        let bundler = EsbuildBundler::new(&config.bundler);
        let pipeline = Pipeline::new(&config, &bundler);

        for template in &templates {
            pipeline.run_stage(template, self.stage)?;
            console.success(&format!("{} {}", self.stage, template.output_folder));
        }

        Ok(CommandResult::success())
    }
}
