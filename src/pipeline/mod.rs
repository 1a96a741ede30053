//! Pipeline orchestration.
//!
//! One template's pipeline is a strictly linear state machine:
//! clean → build → convert → tidy → register. The orchestrator drives it
//! once per registered template, in registry order, never starting template
//! N+1 before template N reached a terminal state.
//!
//! Failure rules: an I/O failure while cleaning and a bundler failure abort
//! the template (later templates still run); a conversion failure is logged
//! and the pipeline continues with the unconverted bundle; a corrupt
//! manifest aborts the entire run, since partial state must never be written
//! over a manifest we cannot parse.

mod report;

pub use report::{RunReport, Stage, TemplateOutcome, TemplateReport};

use std::time::Instant;

use tracing::warn;

use crate::bundler::{BundleRequest, BundleService};
use crate::config::KitforgeConfig;
use crate::error::{KitforgeError, Result};
use crate::manifest::FrameworkEntry;
use crate::registry::TemplateDefinition;
use crate::{clean, convert, manifest};

/// Progress events emitted during a run.
#[derive(Debug)]
pub enum PipelineProgress<'a> {
    /// A template's pipeline is about to start.
    TemplateStarting {
        template: &'a str,
        index: usize,
        total: usize,
    },
    /// A stage is about to run.
    StageStarting { template: &'a str, stage: Stage },
    /// A stage finished successfully.
    StageFinished { template: &'a str, stage: Stage },
    /// A stage failed. When `fatal` is false the pipeline continues.
    StageFailed {
        template: &'a str,
        stage: Stage,
        error: &'a KitforgeError,
        fatal: bool,
    },
    /// A template's pipeline reached a terminal state.
    TemplateFinished { report: &'a TemplateReport },
}

/// Drives the per-template pipeline across the registry.
pub struct Pipeline<'a> {
    config: &'a KitforgeConfig,
    bundler: &'a dyn BundleService,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline over the given configuration and bundling service.
    pub fn new(config: &'a KitforgeConfig, bundler: &'a dyn BundleService) -> Self {
        Self { config, bundler }
    }

    /// Run the full pipeline for every template, in order.
    ///
    /// Returns `Err` only for run-fatal conditions (a corrupt manifest);
    /// per-template failures are recorded in the report.
    pub fn run_all(&self, templates: &[TemplateDefinition]) -> Result<RunReport> {
        self.run_all_with_progress(templates, |_| {})
    }

    /// Run the full pipeline with a progress callback.
    pub fn run_all_with_progress(
        &self,
        templates: &[TemplateDefinition],
        mut on_progress: impl FnMut(PipelineProgress<'_>),
    ) -> Result<RunReport> {
        let start = Instant::now();
        let total = templates.len();
        let mut reports = Vec::with_capacity(total);

        for (index, template) in templates.iter().enumerate() {
            on_progress(PipelineProgress::TemplateStarting {
                template: template.output_folder,
                index,
                total,
            });

            let report = self.run_template_with_progress(template, &mut on_progress)?;
            on_progress(PipelineProgress::TemplateFinished { report: &report });
            reports.push(report);
        }

        Ok(RunReport {
            templates: reports,
            duration: start.elapsed(),
        })
    }

    /// Run one template's pipeline to a terminal state.
    pub fn run_template(&self, template: &TemplateDefinition) -> Result<TemplateReport> {
        self.run_template_with_progress(template, &mut |_| {})
    }

    fn run_template_with_progress(
        &self,
        template: &TemplateDefinition,
        on_progress: &mut impl FnMut(PipelineProgress<'_>),
    ) -> Result<TemplateReport> {
        let start = Instant::now();
        let folder = template.output_folder;
        let mut converted = true;

        for stage in [
            Stage::Clean,
            Stage::Build,
            Stage::Convert,
            Stage::Tidy,
            Stage::Register,
        ] {
            on_progress(PipelineProgress::StageStarting {
                template: folder,
                stage,
            });

            let result = self.run_stage(template, stage);
            match result {
                Ok(()) => {
                    on_progress(PipelineProgress::StageFinished {
                        template: folder,
                        stage,
                    });
                }
                Err(error) => {
                    // Conversion failures are recoverable: keep the
                    // unconverted bundle and carry on to tidy + register.
                    if stage == Stage::Convert {
                        warn!("{}", error);
                        on_progress(PipelineProgress::StageFailed {
                            template: folder,
                            stage,
                            error: &error,
                            fatal: false,
                        });
                        converted = false;
                        continue;
                    }

                    on_progress(PipelineProgress::StageFailed {
                        template: folder,
                        stage,
                        error: &error,
                        fatal: true,
                    });

                    // A manifest we cannot parse aborts the whole run.
                    if matches!(error, KitforgeError::ManifestCorrupt { .. }) {
                        return Err(error);
                    }

                    return Ok(TemplateReport {
                        template: folder.to_string(),
                        outcome: TemplateOutcome::Aborted {
                            stage,
                            error: error.to_string(),
                        },
                        duration: start.elapsed(),
                    });
                }
            }
        }

        Ok(TemplateReport {
            template: folder.to_string(),
            outcome: TemplateOutcome::Completed { converted },
            duration: start.elapsed(),
        })
    }

    /// Run a single stage for one template. Used by the per-stage
    /// subcommands; each stage is idempotent to re-run.
    pub fn run_stage(&self, template: &TemplateDefinition, stage: Stage) -> Result<()> {
        match stage {
            Stage::Clean => clean::remove_path(&self.config.output_dir(template.output_folder)),
            Stage::Build => self
                .bundler
                .bundle(&BundleRequest::for_template(self.config, template)),
            Stage::Convert => {
                convert::convert_in_place(&self.config.bundle_path(template.output_folder))
            }
            Stage::Tidy => clean::tidy_output(
                &self.config.output_dir(template.output_folder),
                &self.config.bundle_name,
            ),
            Stage::Register => {
                manifest::upsert(&self.config.manifest, &FrameworkEntry::from(template))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::MockBundler;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    const TEMPLATE_A: TemplateDefinition = TemplateDefinition {
        entry_file: "a.ts",
        output_folder: "out-a",
        has_starter_kit: true,
    };

    const TEMPLATE_B: TemplateDefinition = TemplateDefinition {
        entry_file: "b.ts",
        output_folder: "out-b",
        has_starter_kit: false,
    };

    fn config(temp: &TempDir) -> KitforgeConfig {
        KitforgeConfig::load(temp.path()).unwrap()
    }

    #[test]
    fn full_pipeline_produces_bundle_without_aux_artifacts() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let bundler = MockBundler::new();
        let pipeline = Pipeline::new(&config, &bundler);

        let report = pipeline.run_all(&[TEMPLATE_A]).unwrap();

        assert!(report.success());
        let out = config.output_dir("out-a");
        assert!(out.join("actions-codegen.js").exists());
        assert!(!out.join("actions-codegen.js.map").exists());
        assert!(!out.join("manifest-server.json").exists());

        let entries = manifest::load(&config.manifest).unwrap();
        assert_eq!(entries, vec![json!({"name": "out-a", "hasStarterKit": true})]);
    }

    #[test]
    fn bundle_is_converted_for_dual_environment() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let bundler = MockBundler::new();
        let pipeline = Pipeline::new(&config, &bundler);

        pipeline.run_all(&[TEMPLATE_A]).unwrap();

        let bundle = fs::read_to_string(config.bundle_path("out-a")).unwrap();
        assert!(bundle.starts_with(convert::WRAPPER_MARKER));
    }

    #[test]
    fn stages_run_in_order() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let bundler = MockBundler::new();
        let pipeline = Pipeline::new(&config, &bundler);

        let mut events = Vec::new();
        pipeline
            .run_all_with_progress(&[TEMPLATE_A], |progress| {
                if let PipelineProgress::StageFinished { stage, .. } = progress {
                    events.push(stage);
                }
            })
            .unwrap();

        assert_eq!(
            events,
            vec![
                Stage::Clean,
                Stage::Build,
                Stage::Convert,
                Stage::Tidy,
                Stage::Register
            ]
        );
    }

    #[test]
    fn templates_run_in_registry_order() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let bundler = MockBundler::new();
        let pipeline = Pipeline::new(&config, &bundler);

        pipeline.run_all(&[TEMPLATE_A, TEMPLATE_B]).unwrap();

        let calls = bundler.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].ends_with("a.ts"));
        assert!(calls[1].ends_with("b.ts"));
    }

    #[test]
    fn clean_removes_previous_output() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let stale = config.output_dir("out-a").join("stale.js");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();

        let bundler = MockBundler::new();
        let pipeline = Pipeline::new(&config, &bundler);
        pipeline.run_all(&[TEMPLATE_A]).unwrap();

        assert!(!stale.exists());
        assert!(config.bundle_path("out-a").exists());
    }

    #[test]
    fn build_failure_aborts_template_but_not_run() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let mut bundler = MockBundler::new();
        bundler.fail_for("a.ts");
        let pipeline = Pipeline::new(&config, &bundler);

        let report = pipeline.run_all(&[TEMPLATE_A, TEMPLATE_B]).unwrap();

        assert!(!report.success());
        assert_eq!(report.aborted().count(), 1);
        assert_eq!(report.completed().count(), 1);

        let aborted = report.aborted().next().unwrap();
        assert_eq!(aborted.template, "out-a");
        assert!(matches!(
            aborted.outcome,
            TemplateOutcome::Aborted {
                stage: Stage::Build,
                ..
            }
        ));

        // The failed template registered nothing; the healthy one did.
        let entries = manifest::load(&config.manifest).unwrap();
        assert_eq!(entries, vec![json!({"name": "out-b", "hasStarterKit": false})]);
    }

    #[test]
    fn build_failure_skips_later_stages_of_that_template() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let mut bundler = MockBundler::new();
        bundler.fail_for("a.ts");
        let pipeline = Pipeline::new(&config, &bundler);

        let mut stages_after_build = Vec::new();
        pipeline
            .run_all_with_progress(&[TEMPLATE_A], |progress| {
                if let PipelineProgress::StageStarting { stage, .. } = progress {
                    if stage > Stage::Build {
                        stages_after_build.push(stage);
                    }
                }
            })
            .unwrap();

        assert!(stages_after_build.is_empty());
    }

    /// Bundler that emits an empty bundle, which the converter rejects.
    struct EmptyBundler;

    impl BundleService for EmptyBundler {
        fn bundle(&self, request: &BundleRequest) -> crate::error::Result<()> {
            fs::create_dir_all(&request.out_dir)?;
            fs::write(request.out_dir.join(&request.bundle_name), "")?;
            fs::write(
                request.out_dir.join(format!("{}.map", request.bundle_name)),
                "{}",
            )?;
            fs::write(request.out_dir.join("manifest-server.json"), "{}")?;
            Ok(())
        }
    }

    #[test]
    fn conversion_failure_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let bundler = EmptyBundler;
        let pipeline = Pipeline::new(&config, &bundler);

        let report = pipeline.run_all(&[TEMPLATE_A]).unwrap();

        assert!(report.success());
        assert!(matches!(
            report.templates[0].outcome,
            TemplateOutcome::Completed { converted: false }
        ));

        // Aux artifacts still tidied, manifest still updated.
        let out = config.output_dir("out-a");
        assert!(!out.join("actions-codegen.js.map").exists());
        assert!(!out.join("manifest-server.json").exists());
        let entries = manifest::load(&config.manifest).unwrap();
        assert_eq!(entries[0]["name"], "out-a");
    }

    #[test]
    fn corrupt_manifest_aborts_entire_run() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        fs::write(&config.manifest, "not json").unwrap();

        let bundler = MockBundler::new();
        let pipeline = Pipeline::new(&config, &bundler);

        let err = pipeline.run_all(&[TEMPLATE_A, TEMPLATE_B]).unwrap_err();
        assert!(matches!(err, KitforgeError::ManifestCorrupt { .. }));

        // The run stopped at the first register stage: B never built.
        assert_eq!(bundler.calls().len(), 1);
        // The corrupt file was not overwritten.
        assert_eq!(fs::read_to_string(&config.manifest).unwrap(), "not json");
    }

    #[test]
    fn rerunning_pipeline_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        let bundler = MockBundler::new();
        let pipeline = Pipeline::new(&config, &bundler);

        pipeline.run_all(&[TEMPLATE_A]).unwrap();
        let first = fs::read_to_string(&config.manifest).unwrap();

        pipeline.run_all(&[TEMPLATE_A]).unwrap();
        let second = fs::read_to_string(&config.manifest).unwrap();

        assert_eq!(first, second);
        assert_eq!(manifest::load(&config.manifest).unwrap().len(), 1);
    }

    #[test]
    fn preexisting_manifest_entries_survive_a_run() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        manifest::write(
            &config.manifest,
            &[json!({"name": "legacy", "hasStarterKit": false, "pinned": true})],
        )
        .unwrap();

        let bundler = MockBundler::new();
        let pipeline = Pipeline::new(&config, &bundler);
        pipeline.run_all(&[TEMPLATE_A]).unwrap();

        let entries = manifest::load(&config.manifest).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            json!({"name": "legacy", "hasStarterKit": false, "pinned": true})
        );
        assert_eq!(entries[1]["name"], "out-a");
    }
}
