//! The aggregate `build` command.
//!
//! Runs the full clean → bundle → convert → tidy → register pipeline for
//! every selected template, renders per-template progress, and prints a
//! run summary. The exit code reflects the report: non-zero when any
//! template aborted, even though later templates were still attempted.

use std::path::{Path, PathBuf};

use crate::bundler::EsbuildBundler;
use crate::cli::args::TemplateArgs;
use crate::error::Result;
use crate::pipeline::{Pipeline, PipelineProgress, TemplateOutcome};
use crate::ui::{format_duration, Console, ProgressSpinner};

use super::dispatcher::{Command, CommandResult};

/// The build command implementation.
pub struct BuildCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: TemplateArgs,
}

impl BuildCommand {
    /// Create a new build command.
    pub fn new(project_root: &Path, config_path: Option<PathBuf>, args: TemplateArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path,
            args,
        }
    }
}

impl Command for BuildCommand {
    fn execute(&self, console: &Console) -> Result<CommandResult> {
        let config = super::load_config(&self.project_root, &self.config_path)?;
        let templates = super::select_templates(&self.args.template)?;

        console.message(&console.theme().format_header("kitforge build"));

        let bundler = EsbuildBundler::new(&config.bundler);
        let pipeline = Pipeline::new(&config, &bundler);

        let mut spinner: Option<ProgressSpinner> = None;
        let mut label = String::new();
        let mut warnings: Vec<String> = Vec::new();

        let report = pipeline.run_all_with_progress(&templates, |progress| match progress {
            PipelineProgress::TemplateStarting {
                template,
                index,
                total,
            } => {
                label = format!("[{}/{}] {}", index + 1, total, template);
                // Plain per-template lines when there is no live terminal
                spinner = if console.is_interactive() {
                    Some(console.spinner(&label))
                } else {
                    None
                };
            }
            PipelineProgress::StageStarting { stage, .. } => {
                if let Some(s) = spinner.as_mut() {
                    s.set_message(&format!("{}: {}", label, stage));
                }
            }
            PipelineProgress::StageFailed {
                error,
                fatal: false,
                ..
            } => {
                warnings.push(error.to_string());
            }
            PipelineProgress::TemplateFinished { report } => {
                let duration = format_duration(report.duration);
                if let Some(mut s) = spinner.take() {
                    match &report.outcome {
                        TemplateOutcome::Completed { converted: true } => {
                            s.finish_success(&format!("{} ({})", report.template, duration));
                        }
                        TemplateOutcome::Completed { converted: false } => {
                            s.finish_warning(&format!(
                                "{} ({}) — bundle left unconverted",
                                report.template, duration
                            ));
                        }
                        TemplateOutcome::Aborted { stage, .. } => {
                            s.finish_error(&format!(
                                "{} failed during {} ({})",
                                report.template, stage, duration
                            ));
                        }
                    }
                } else {
                    match &report.outcome {
                        TemplateOutcome::Completed { converted: true } => {
                            console.success(&format!("{} ({})", report.template, duration));
                        }
                        TemplateOutcome::Completed { converted: false } => {
                            console.warning(&format!(
                                "{} ({}) — bundle left unconverted",
                                report.template, duration
                            ));
                        }
                        TemplateOutcome::Aborted { stage, .. } => {
                            console.error(&format!(
                                "{} failed during {} ({})",
                                report.template, stage, duration
                            ));
                        }
                    }
                }
                for warning in warnings.drain(..) {
                    console.warning(&warning);
                }
            }
            _ => {}
        })?;

        console.message("");
        if report.success() {
            console.success(&format!(
                "Built {} template{} in {}",
                report.templates.len(),
                if report.templates.len() == 1 { "" } else { "s" },
                format_duration(report.duration)
            ));
            Ok(CommandResult::success())
        } else {
            for aborted in report.aborted() {
                if let TemplateOutcome::Aborted { stage, error } = &aborted.outcome {
                    console.error(&format!("{} ({}): {}", aborted.template, stage, error));
                }
            }
            console.error(&format!(
                "{} of {} templates failed",
                report.aborted().count(),
                report.templates.len()
            ));
            Ok(CommandResult::failure(1))
        }
    }
}
