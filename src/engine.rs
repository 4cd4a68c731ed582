//! # Bundling Engine Contract
//!
//! The artifact that gets published is produced by an external bundling
//! engine. This module only fixes the engine's typed contract and what the
//! build step does with its answer; the bundling algorithm itself lives
//! elsewhere.
//!
//! [`build`] is a library entry point for build tooling; the CLI only
//! publishes an artifact that already exists.
//!
//! Any diagnostic from the engine fails the build before a single file is
//! written, which in turn guarantees a publish is never attempted on a
//! broken artifact.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Input to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackRequest {
    /// URL of the entry-point module.
    pub entry_point: String,
    /// URL of an import map, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_map: Option<String>,
}

/// Successful engine output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackOutput {
    /// Generated JavaScript source.
    pub js: String,
    /// Declaration file text.
    pub dts: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_map: Option<serde_json::Value>,
    pub has_default_export: bool,
}

/// One problem reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub specifier: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_and_column: Option<LineAndColumn>,
}

/// Zero-based position inside a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineAndColumn {
    pub line_number: usize,
    pub column_number: usize,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line_and_column {
            Some(pos) => write!(
                f,
                "{} ({}:{}): {}",
                self.specifier,
                pos.line_number + 1,
                pos.column_number + 1,
                self.message
            ),
            None => write!(f, "{}: {}", self.specifier, self.message),
        }
    }
}

/// The external bundler, as a single synchronous capability.
pub trait BundleEngine {
    fn pack(&self, request: &PackRequest) -> std::result::Result<PackOutput, Vec<Diagnostic>>;
}

/// Files written by [`build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    pub js: PathBuf,
    pub dts: PathBuf,
    pub import_map: Option<PathBuf>,
    pub has_default_export: bool,
}

/// Runs the engine and writes its output next to `js_path`.
///
/// Writes `<name>.js` (with a reference to its declaration file),
/// `<name>.d.ts`, and `import_map.json` when the engine resolved one.
pub fn build(engine: &dyn BundleEngine, request: &PackRequest, js_path: &Path) -> Result<BuildOutput> {
    let output = engine.pack(request).map_err(diagnostics_error)?;
    let dts_path = js_path.with_extension("d.ts");
    let dts_name = dts_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Some(parent) = js_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(
        js_path,
        format!("/// <reference types=\"./{}\" />\n{}", dts_name, output.js),
    )?;
    fs::write(&dts_path, &output.dts)?;

    let import_map = match &output.import_map {
        Some(map) => {
            let path = js_path.with_file_name("import_map.json");
            fs::write(&path, serde_json::to_string_pretty(map)?)?;
            Some(path)
        }
        None => None,
    };

    info!("Wrote {} and {}", js_path.display(), dts_path.display());
    Ok(BuildOutput {
        js: js_path.to_path_buf(),
        dts: dts_path,
        import_map,
        has_default_export: output.has_default_export,
    })
}

fn diagnostics_error(diagnostics: Vec<Diagnostic>) -> Error {
    let details = diagnostics
        .iter()
        .map(|d| format!("  {}", d))
        .collect::<Vec<_>>()
        .join("\n");
    Error::Diagnostics {
        count: diagnostics.len(),
        details,
    }
}
