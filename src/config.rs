//! Configuration loading and resolution.
//!
//! kitforge works out of the box with built-in defaults; an optional
//! `kitforge.yml` in the project root overrides paths, the bundle file name,
//! the bundler command, and the dependency-externalization allow-list.
//! Relative paths in the file are resolved against the project root.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{KitforgeError, Result};

/// Default config file name inside the project root.
pub const CONFIG_FILE: &str = "kitforge.yml";

/// Default name of the generated bundle inside each output folder.
pub const DEFAULT_BUNDLE_NAME: &str = "actions-codegen.js";

/// Default name of the shared manifest file.
pub const DEFAULT_MANIFEST_NAME: &str = "frameworks.json";

/// Server metafile emitted by the bundler alongside the bundle.
pub const SERVER_METAFILE: &str = "manifest-server.json";

/// Raw shape of `kitforge.yml`. All fields optional; unknown keys rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    templates_dir: Option<PathBuf>,
    output_root: Option<PathBuf>,
    manifest: Option<PathBuf>,
    bundle_name: Option<String>,
    bundler: Option<String>,
    externals: Vec<String>,
}

/// Resolved kitforge configuration.
#[derive(Debug, Clone)]
pub struct KitforgeConfig {
    /// Directory containing the codegen entry scripts.
    pub templates_dir: PathBuf,

    /// Root directory under which per-framework output folders are created.
    pub output_root: PathBuf,

    /// Path to the shared frameworks manifest.
    pub manifest: PathBuf,

    /// File name of the generated bundle inside each output folder.
    pub bundle_name: String,

    /// Command invoked to bundle an entry point.
    pub bundler: String,

    /// Dependencies excluded from inlining. Empty means fully self-contained.
    pub externals: Vec<String>,
}

impl KitforgeConfig {
    /// Load configuration for a project root, reading `kitforge.yml` if
    /// present and falling back to defaults otherwise.
    pub fn load(project_root: &Path) -> Result<Self> {
        Self::load_from(project_root, &project_root.join(CONFIG_FILE))
    }

    /// Load configuration from an explicit config file path.
    ///
    /// A missing file yields the defaults; an unparseable file is an error.
    pub fn load_from(project_root: &Path, config_path: &Path) -> Result<Self> {
        let raw = if config_path.exists() {
            let content = fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content).map_err(|e| KitforgeError::ConfigParse {
                path: config_path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            RawConfig::default()
        };

        Ok(Self::resolve(project_root, raw))
    }

    fn resolve(project_root: &Path, raw: RawConfig) -> Self {
        let resolve_path = |p: PathBuf| {
            if p.is_absolute() {
                p
            } else {
                project_root.join(p)
            }
        };

        let output_root = resolve_path(
            raw.output_root
                .unwrap_or_else(|| PathBuf::from(".")),
        );
        let manifest = raw
            .manifest
            .map(resolve_path)
            .unwrap_or_else(|| output_root.join(DEFAULT_MANIFEST_NAME));

        Self {
            templates_dir: resolve_path(
                raw.templates_dir
                    .unwrap_or_else(|| PathBuf::from("src/templates")),
            ),
            output_root,
            manifest,
            bundle_name: raw
                .bundle_name
                .unwrap_or_else(|| DEFAULT_BUNDLE_NAME.to_string()),
            bundler: raw.bundler.unwrap_or_else(|| "esbuild".to_string()),
            externals: raw.externals,
        }
    }

    /// Output folder for one template.
    pub fn output_dir(&self, output_folder: &str) -> PathBuf {
        self.output_root.join(output_folder)
    }

    /// Path of the generated bundle for one template.
    pub fn bundle_path(&self, output_folder: &str) -> PathBuf {
        self.output_dir(output_folder).join(&self.bundle_name)
    }

    /// Path of the entry script for one template.
    pub fn entry_path(&self, entry_file: &str) -> PathBuf {
        self.templates_dir.join(entry_file)
    }
}
