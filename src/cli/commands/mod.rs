//! CLI command implementations.

pub mod build;
pub mod completions;
pub mod dispatcher;
pub mod doctor;
pub mod list;
pub mod stage;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

use std::path::{Path, PathBuf};

use crate::config::KitforgeConfig;
use crate::error::{KitforgeError, Result};
use crate::registry::{self, TemplateDefinition};

/// Load the project configuration, honoring an explicit `--config` path.
fn load_config(project_root: &Path, config_path: &Option<PathBuf>) -> Result<KitforgeConfig> {
    match config_path {
        Some(path) => KitforgeConfig::load_from(project_root, path),
        None => KitforgeConfig::load(project_root),
    }
}

/// Resolve the templates a command targets: one by output folder, or the
/// whole registry when no folder was named.
fn select_templates(template: &Option<String>) -> Result<Vec<TemplateDefinition>> {
    match template {
        Some(name) => registry::find(name)
            .map(|t| vec![*t])
            .ok_or_else(|| KitforgeError::UnknownTemplate { name: name.clone() }),
        None => Ok(registry::all().to_vec()),
    }
}
