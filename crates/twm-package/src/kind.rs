//! Input classification and output naming.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{PackageError, Result};

/// Appended to the file stem of every migrated output.
pub const DEFAULT_SUFFIX: &str = "-Snowflake";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// Zip archive (`.twbx`, `.tdsx`) with the descriptor extension it holds.
    Packaged { descriptor_extension: String },
    /// Bare XML descriptor (`.twb`, `.tds`).
    Descriptor,
}

/// Decide how to read `path` from its extension (case-insensitive).
pub fn classify(path: &Path) -> Result<InputKind> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "twbx" | "tdsx" => Ok(InputKind::Packaged {
            descriptor_extension: extension.trim_end_matches('x').to_string(),
        }),
        "twb" | "tds" => Ok(InputKind::Descriptor),
        _ => Err(PackageError::UnsupportedExtension {
            path: path.to_path_buf(),
        }),
    }
}

/// `dir/name.ext` to `dir/name<suffix>.ext`.
pub fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.file_stem().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    if let Some(extension) = path.extension() {
        name.push(".");
        name.push(extension);
    }
    path.with_file_name(name)
}
