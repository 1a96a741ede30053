//! Pipeline run reporting.

use std::time::Duration;

/// The five stages of a per-template pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Remove the previous output folder.
    Clean,
    /// Compile the entry point into a bundle.
    Build,
    /// Rewrite the bundle for dual-environment execution.
    Convert,
    /// Remove auxiliary build artifacts.
    Tidy,
    /// Upsert the template's entry into the shared manifest.
    Register,
}

impl Stage {
    /// Stage name as shown in output and subcommand names.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Clean => "clean",
            Stage::Build => "bundle",
            Stage::Convert => "convert",
            Stage::Tidy => "tidy",
            Stage::Register => "register",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Terminal state of one template's pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOutcome {
    /// All five stages ran. `converted` is false when the conversion stage
    /// failed non-fatally and the unconverted bundle was kept.
    Completed { converted: bool },

    /// A fatal stage failed; later stages did not run.
    Aborted { stage: Stage, error: String },
}

/// Result of one template's pipeline run.
#[derive(Debug, Clone)]
pub struct TemplateReport {
    /// Template identity (output folder name).
    pub template: String,

    /// Terminal state.
    pub outcome: TemplateOutcome,

    /// Wall-clock duration of this template's pipeline.
    pub duration: Duration,
}

impl TemplateReport {
    /// Whether this template reached `Completed`.
    pub fn completed(&self) -> bool {
        matches!(self.outcome, TemplateOutcome::Completed { .. })
    }
}

/// Aggregate result of a multi-template run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Per-template reports, in registry order.
    pub templates: Vec<TemplateReport>,

    /// Total wall-clock duration.
    pub duration: Duration,
}

impl RunReport {
    /// True iff no template aborted.
    pub fn success(&self) -> bool {
        self.templates.iter().all(TemplateReport::completed)
    }

    /// Templates that completed.
    pub fn completed(&self) -> impl Iterator<Item = &TemplateReport> {
        self.templates.iter().filter(|t| t.completed())
    }

    /// Templates that aborted.
    pub fn aborted(&self) -> impl Iterator<Item = &TemplateReport> {
        self.templates.iter().filter(|t| !t.completed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(template: &str) -> TemplateReport {
        TemplateReport {
            template: template.to_string(),
            outcome: TemplateOutcome::Completed { converted: true },
            duration: Duration::from_millis(10),
        }
    }

    fn aborted(template: &str, stage: Stage) -> TemplateReport {
        TemplateReport {
            template: template.to_string(),
            outcome: TemplateOutcome::Aborted {
                stage,
                error: "boom".to_string(),
            },
            duration: Duration::from_millis(10),
        }
    }

    #[test]
    fn stages_are_ordered() {
        assert!(Stage::Clean < Stage::Build);
        assert!(Stage::Build < Stage::Convert);
        assert!(Stage::Convert < Stage::Tidy);
        assert!(Stage::Tidy < Stage::Register);
    }

    #[test]
    fn stage_names_match_subcommands() {
        assert_eq!(Stage::Clean.name(), "clean");
        assert_eq!(Stage::Build.name(), "bundle");
        assert_eq!(Stage::Register.to_string(), "register");
    }

    #[test]
    fn empty_run_is_success() {
        assert!(RunReport::default().success());
    }

    #[test]
    fn run_with_abort_is_failure() {
        let report = RunReport {
            templates: vec![completed("a"), aborted("b", Stage::Build)],
            duration: Duration::from_secs(1),
        };
        assert!(!report.success());
        assert_eq!(report.completed().count(), 1);
        assert_eq!(report.aborted().count(), 1);
    }

    #[test]
    fn completed_with_failed_conversion_still_counts_as_completed() {
        let report = TemplateReport {
            template: "a".to_string(),
            outcome: TemplateOutcome::Completed { converted: false },
            duration: Duration::ZERO,
        };
        assert!(report.completed());
    }
}
