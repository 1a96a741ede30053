//! Bundle building.
//!
//! The bundler is an external collaborator: kitforge composes an
//! esbuild-compatible command line and runs it through the shell. The
//! [`BundleService`] trait is the seam: the pipeline only sees the trait,
//! so tests substitute [`MockBundler`] and integration tests point the
//! config at a stub script.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::config::{KitforgeConfig, SERVER_METAFILE};
use crate::error::{KitforgeError, Result};
use crate::registry::TemplateDefinition;
use crate::shell;

/// One bundling job: compile `entry` into `out_dir/bundle_name`.
#[derive(Debug, Clone)]
pub struct BundleRequest {
    /// Entry script to compile.
    pub entry: PathBuf,

    /// Destination folder for the bundle and its auxiliary artifacts.
    pub out_dir: PathBuf,

    /// File name of the bundle inside `out_dir`.
    pub bundle_name: String,

    /// Dependencies left out of the bundle. Empty means inline everything.
    pub externals: Vec<String>,
}

impl BundleRequest {
    /// Build the request for one template under the given configuration.
    pub fn for_template(config: &KitforgeConfig, template: &TemplateDefinition) -> Self {
        Self {
            entry: config.entry_path(template.entry_file),
            out_dir: config.output_dir(template.output_folder),
            bundle_name: config.bundle_name.clone(),
            externals: config.externals.clone(),
        }
    }
}

/// The bundling service consumed by the pipeline.
pub trait BundleService {
    /// Compile the entry point into a single self-contained bundle, writing
    /// the bundle plus auxiliary artifacts (source map, server metafile)
    /// into the request's output folder.
    fn bundle(&self, request: &BundleRequest) -> Result<()>;
}

/// Production bundler: shells out to esbuild (or whatever command the
/// config names, as long as it accepts esbuild-compatible flags).
#[derive(Debug, Clone)]
pub struct EsbuildBundler {
    command: String,
}

impl EsbuildBundler {
    /// Create a bundler invoking the given command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// The configured bundler command.
    pub fn command(&self) -> &str {
        &self.command
    }

    fn compose(&self, request: &BundleRequest) -> String {
        let outfile = request.out_dir.join(&request.bundle_name);
        let metafile = request.out_dir.join(SERVER_METAFILE);

        let mut cmd = format!(
            "{} \"{}\" --bundle --platform=node --format=cjs --outfile=\"{}\" --sourcemap --metafile=\"{}\"",
            self.command,
            request.entry.display(),
            outfile.display(),
            metafile.display(),
        );
        for external in &request.externals {
            cmd.push_str(&format!(" --external:{}", external));
        }
        cmd
    }
}

impl BundleService for EsbuildBundler {
    fn bundle(&self, request: &BundleRequest) -> Result<()> {
        let command = self.compose(request);
        debug!("bundling: {}", command);

        let template = request
            .out_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| request.out_dir.display().to_string());

        let result =
            shell::execute_quiet(&command, None).map_err(|e| KitforgeError::BuildFailed {
                template: template.clone(),
                message: e.to_string(),
            })?;

        if result.success {
            Ok(())
        } else {
            let diagnostic = if result.stderr.trim().is_empty() {
                format!("bundler exited with code {:?}", result.exit_code)
            } else {
                result.stderr.trim().to_string()
            };
            Err(KitforgeError::BuildFailed {
                template,
                message: diagnostic,
            })
        }
    }
}

/// In-memory bundler for tests: records every request and, on success,
/// writes a plausible bundle plus the auxiliary artifacts the real bundler
/// would leave behind.
#[derive(Debug, Default)]
pub struct MockBundler {
    fail_entries: HashSet<String>,
    calls: RefCell<Vec<PathBuf>>,
}

impl MockBundler {
    /// Create a mock that succeeds for every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make requests for this entry file name fail with `BuildFailed`.
    pub fn fail_for(&mut self, entry_file: &str) {
        self.fail_entries.insert(entry_file.to_string());
    }

    /// Entry paths bundled so far, in call order.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.borrow().clone()
    }
}

impl BundleService for MockBundler {
    fn bundle(&self, request: &BundleRequest) -> Result<()> {
        self.calls.borrow_mut().push(request.entry.clone());

        let entry_name = request
            .entry
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.fail_entries.contains(&entry_name) {
            return Err(KitforgeError::BuildFailed {
                template: entry_name,
                message: "mock bundler configured to fail".into(),
            });
        }

        fs::create_dir_all(&request.out_dir)?;
        let bundle = request.out_dir.join(&request.bundle_name);
        fs::write(&bundle, "\"use strict\";\nmodule.exports = { generate: () => [] };\n")?;
        fs::write(
            request.out_dir.join(format!("{}.map", request.bundle_name)),
            "{\"version\":3,\"sources\":[]}",
        )?;
        fs::write(request.out_dir.join(SERVER_METAFILE), "{\"outputs\":{}}")?;
        Ok(())
    }
}
