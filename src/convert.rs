//! Cross-environment conversion.
//!
//! The bundler emits a CommonJS bundle targeting a server runtime. This
//! module rewrites that bundle in place so the same file also runs in a
//! browser: a wrapper header detects whether a real `module` object exists
//! and, if not, synthesizes one and publishes the exports on the global
//! object. Single file in, single file out, same path.
//!
//! Conversion is idempotent: a bundle already carrying the wrapper marker
//! is returned unchanged, so the `convert` subcommand is safe to re-run.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{KitforgeError, Result};

/// First line of a converted bundle. Detected to keep conversion idempotent.
pub const WRAPPER_MARKER: &str = "// kitforge:dual-env v1";

const WRAPPER_HEAD: &str = r#"(function (global, factory) {
  if (typeof module === "object" && typeof module.exports === "object") {
    factory(module, module.exports, typeof require === "function" ? require : undefined);
  } else {
    var shim = { exports: {} };
    factory(shim, shim.exports, undefined);
    global.actionsCodegen = shim.exports;
  }
})(typeof globalThis !== "undefined" ? globalThis : typeof self !== "undefined" ? self : this, function (module, exports, require) {
"#;

const WRAPPER_TAIL: &str = "\n});\n";

/// Wrap a CommonJS bundle so it runs both as a standalone script and as an
/// importable module. Already-converted input is returned unchanged.
pub fn convert(source: &str) -> Result<String> {
    if source.starts_with(WRAPPER_MARKER) {
        return Ok(source.to_string());
    }
    if source.trim().is_empty() {
        return Err(conversion_error("<bundle>", "bundle is empty"));
    }

    let mut out = String::with_capacity(
        WRAPPER_MARKER.len() + WRAPPER_HEAD.len() + source.len() + WRAPPER_TAIL.len() + 1,
    );
    out.push_str(WRAPPER_MARKER);
    out.push('\n');
    out.push_str(WRAPPER_HEAD);
    out.push_str(source);
    out.push_str(WRAPPER_TAIL);
    Ok(out)
}

/// Convert the bundle at `path` in place.
///
/// All failures (unreadable file, non-UTF-8 content, empty bundle) are
/// reported as [`KitforgeError::ConversionFailed`]; the caller decides
/// whether that is fatal (the pipeline treats it as non-fatal and keeps the
/// unconverted bundle).
pub fn convert_in_place(path: &Path) -> Result<()> {
    let template = template_name(path);

    let bytes =
        fs::read(path).map_err(|e| conversion_error(&template, &format!("read failed: {}", e)))?;
    let source = String::from_utf8(bytes)
        .map_err(|_| conversion_error(&template, "bundle is not valid UTF-8"))?;

    let converted = match convert(&source) {
        Ok(c) => c,
        Err(KitforgeError::ConversionFailed { message, .. }) => {
            return Err(conversion_error(&template, &message))
        }
        Err(e) => return Err(e),
    };

    if converted == source {
        debug!("{} already converted, leaving as is", path.display());
        return Ok(());
    }

    fs::write(path, converted)
        .map_err(|e| conversion_error(&template, &format!("write failed: {}", e)))?;
    Ok(())
}

fn template_name(bundle_path: &Path) -> String {
    bundle_path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| bundle_path.display().to_string())
}

fn conversion_error(template: &str, message: &str) -> KitforgeError {
    KitforgeError::ConversionFailed {
        template: template.to_string(),
        message: message.to_string(),
    }
}
