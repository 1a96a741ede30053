//! Preflight diagnostics.
//!
//! `kitforge doctor` answers "will a build work here?" before spending time
//! on one: is the bundler on PATH, do the entry scripts exist, is the
//! shared manifest parseable, and is the registry free of duplicate output
//! folders (the one defect the registry itself does not police).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::KitforgeConfig;
use crate::error::{KitforgeError, Result};
use crate::manifest;
use crate::registry::TemplateDefinition;
use crate::shell;

static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+(?:\.\d+)?").unwrap());

/// Severity of one diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticStatus {
    Ok,
    Warning,
    Error,
}

/// One preflight check result.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Short check name (`bundler`, `templates`, `manifest`, `registry`).
    pub name: &'static str,
    pub status: DiagnosticStatus,
    pub detail: String,
}

impl Diagnostic {
    fn ok(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: DiagnosticStatus::Ok,
            detail: detail.into(),
        }
    }

    fn warning(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: DiagnosticStatus::Warning,
            detail: detail.into(),
        }
    }

    fn error(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: DiagnosticStatus::Error,
            detail: detail.into(),
        }
    }
}

/// Probe the bundler command and return its reported version.
pub fn probe_bundler(command: &str) -> Result<String> {
    let result = shell::execute_quiet(&format!("{} --version", command), None).map_err(|e| {
        KitforgeError::BundlerMissing {
            command: command.to_string(),
            message: e.to_string(),
        }
    })?;

    if !result.success {
        let detail = if result.stderr.trim().is_empty() {
            format!("exited with code {:?}", result.exit_code)
        } else {
            result.stderr.trim().to_string()
        };
        return Err(KitforgeError::BundlerMissing {
            command: command.to_string(),
            message: detail,
        });
    }

    let stdout = result.stdout.trim();
    Ok(VERSION
        .find(stdout)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| stdout.lines().next().unwrap_or_default().to_string()))
}

/// Run every preflight check against the given configuration and registry.
pub fn run_diagnostics(
    config: &KitforgeConfig,
    templates: &[TemplateDefinition],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    diagnostics.push(match probe_bundler(&config.bundler) {
        Ok(version) => Diagnostic::ok("bundler", format!("{} {}", config.bundler, version)),
        Err(e) => Diagnostic::error("bundler", e.to_string()),
    });

    diagnostics.push(check_templates(config, templates));
    diagnostics.push(check_manifest(config));
    diagnostics.push(check_registry(templates));

    diagnostics
}

fn check_templates(config: &KitforgeConfig, templates: &[TemplateDefinition]) -> Diagnostic {
    if !config.templates_dir.is_dir() {
        return Diagnostic::error(
            "templates",
            format!("directory not found: {}", config.templates_dir.display()),
        );
    }

    let missing: Vec<_> = templates
        .iter()
        .filter(|t| !config.entry_path(t.entry_file).is_file())
        .map(|t| t.entry_file)
        .collect();

    if missing.is_empty() {
        Diagnostic::ok(
            "templates",
            format!("{} entry scripts present", templates.len()),
        )
    } else {
        Diagnostic::warning("templates", format!("missing entry scripts: {}", missing.join(", ")))
    }
}

fn check_manifest(config: &KitforgeConfig) -> Diagnostic {
    if !config.manifest.exists() {
        return Diagnostic::ok(
            "manifest",
            format!("{} will be created", config.manifest.display()),
        );
    }

    match manifest::load(&config.manifest) {
        Ok(entries) => Diagnostic::ok("manifest", format!("{} entries", entries.len())),
        Err(e) => Diagnostic::error("manifest", e.to_string()),
    }
}

fn check_registry(templates: &[TemplateDefinition]) -> Diagnostic {
    let mut seen = HashSet::new();
    let duplicates: Vec<_> = templates
        .iter()
        .filter(|t| !seen.insert(t.output_folder))
        .map(|t| t.output_folder)
        .collect();

    if duplicates.is_empty() {
        Diagnostic::ok("registry", format!("{} templates registered", templates.len()))
    } else {
        Diagnostic::error(
            "registry",
            format!("duplicate output folders: {}", duplicates.join(", ")),
        )
    }
}
