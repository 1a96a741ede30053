//! Error types for kitforge operations.
//!
//! This module defines [`KitforgeError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - `Io` covers filesystem access; during the clean and tidy stages it is
//!   fatal to that template's pipeline
//! - `BuildFailed` is fatal to the template but not to the overall run
//! - `ConversionFailed` is recovered locally: the pipeline logs it and
//!   continues with the unconverted bundle
//! - `ManifestCorrupt` is fatal to the entire run; a corrupt shared
//!   manifest must never be overwritten with partial state
//! - Use `anyhow::Error` (via `KitforgeError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for kitforge operations.
#[derive(Debug, Error)]
pub enum KitforgeError {
    /// Failed to parse the configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Referenced template does not exist in the registry.
    #[error("Unknown template: {name}")]
    UnknownTemplate { name: String },

    /// The bundler exited non-zero or could not be spawned.
    #[error("Build failed for '{template}': {message}")]
    BuildFailed { template: String, message: String },

    /// Cross-environment conversion of a bundle failed.
    #[error("Conversion failed for '{template}': {message}")]
    ConversionFailed { template: String, message: String },

    /// The shared manifest file exists but is not the expected structure.
    #[error("Manifest at {path} is corrupt: {message}")]
    ManifestCorrupt { path: PathBuf, message: String },

    /// The configured bundler command is not available on this system.
    #[error("Bundler '{command}' not found: {message}")]
    BundlerMissing { command: String, message: String },

    /// Shell command failed to spawn.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for kitforge operations.
pub type Result<T> = std::result::Result<T, KitforgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parse_displays_path_and_message() {
        let err = KitforgeError::ConfigParse {
            path: PathBuf::from("/proj/kitforge.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/proj/kitforge.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn unknown_template_displays_name() {
        let err = KitforgeError::UnknownTemplate {
            name: "rust-rocket".into(),
        };
        assert!(err.to_string().contains("rust-rocket"));
    }

    #[test]
    fn build_failed_displays_template_and_message() {
        let err = KitforgeError::BuildFailed {
            template: "go-serve-mux".into(),
            message: "entry point not found".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("go-serve-mux"));
        assert!(msg.contains("entry point not found"));
    }

    #[test]
    fn conversion_failed_displays_template() {
        let err = KitforgeError::ConversionFailed {
            template: "kotlin-ktor".into(),
            message: "bundle is empty".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("kotlin-ktor"));
        assert!(msg.contains("bundle is empty"));
    }

    #[test]
    fn manifest_corrupt_displays_path_and_message() {
        let err = KitforgeError::ManifestCorrupt {
            path: PathBuf::from("/proj/frameworks.json"),
            message: "expected a JSON array".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("frameworks.json"));
        assert!(msg.contains("expected a JSON array"));
    }

    #[test]
    fn bundler_missing_displays_command() {
        let err = KitforgeError::BundlerMissing {
            command: "esbuild".into(),
            message: "not found on PATH".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("esbuild"));
        assert!(msg.contains("not found on PATH"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = KitforgeError::CommandFailed {
            command: "esbuild entry.ts".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("esbuild entry.ts"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: KitforgeError = io_err.into();
        assert!(matches!(err, KitforgeError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(KitforgeError::UnknownTemplate {
                name: "test".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
