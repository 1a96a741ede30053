//! Artifact cleaning.
//!
//! Removal is idempotent: a missing path is a successful no-op, so stage
//! subcommands can be re-run freely. Any other filesystem error (permission
//! denied, etc.) surfaces as [`KitforgeError::Io`].

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::config::SERVER_METAFILE;
use crate::error::Result;

/// Remove a file or directory tree. Missing paths are a no-op.
pub fn remove_path(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    debug!("removing {}", path.display());
    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Remove the auxiliary build artifacts from an output folder: the source
/// map next to the bundle and the server metafile. The bundle itself stays.
pub fn tidy_output(out_dir: &Path, bundle_name: &str) -> Result<()> {
    remove_path(&out_dir.join(format!("{}.map", bundle_name)))?;
    remove_path(&out_dir.join(SERVER_METAFILE))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn remove_missing_path_is_noop() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("does-not-exist");
        assert!(remove_path(&path).is_ok());
    }

    #[test]
    fn remove_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("artifact.js");
        fs::write(&path, "content").unwrap();

        remove_path(&path).unwrap();
        assert!(!path.exists());

        // Second call sees the same final state with no error
        remove_path(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn remove_deletes_directory_tree() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("go-serve-mux");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("nested/file.js"), "x").unwrap();

        remove_path(&dir).unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn tidy_removes_aux_artifacts_but_not_bundle() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out-a");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("actions-codegen.js"), "bundle").unwrap();
        fs::write(out.join("actions-codegen.js.map"), "{}").unwrap();
        fs::write(out.join("manifest-server.json"), "{}").unwrap();

        tidy_output(&out, "actions-codegen.js").unwrap();

        assert!(out.join("actions-codegen.js").exists());
        assert!(!out.join("actions-codegen.js.map").exists());
        assert!(!out.join("manifest-server.json").exists());
    }

    #[test]
    fn tidy_with_nothing_to_remove_succeeds() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out-a");
        fs::create_dir_all(&out).unwrap();

        tidy_output(&out, "actions-codegen.js").unwrap();
    }
}
