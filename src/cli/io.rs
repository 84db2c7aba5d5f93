//! File naming and text output for CLI commands
//!
//! Outputs are written next to their input with the extension swapped.
//! Extension checks ignore case.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ErrorCode;

use super::errors::{CliError, CliResult};

pub const PARQUET_EXTENSION: &str = "parquet";
pub const CSV_EXTENSION: &str = "csv";
pub const JSON_EXTENSION: &str = "json";
pub const SCHEMA_EXTENSION: &str = "avsc";

/// Returns whether `path` ends in `.<extension>`, ignoring case
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case(extension))
}

/// Rejects inputs whose extension is none of `expected`
pub fn require_extension(path: &Path, expected: &[&str]) -> CliResult<()> {
    if expected.iter().any(|ext| has_extension(path, ext)) {
        Ok(())
    } else {
        Err(CliError::unexpected_extension(path, expected))
    }
}

/// `dir/base.<old>` becomes `dir/base.<extension>`
pub fn sibling_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}

/// Reads a UTF-8 input file
pub fn read_text(path: &Path) -> CliResult<String> {
    fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))
}

/// Writes `text` to `path`.
///
/// Empty text leaves no file behind; returns whether a file was kept.
pub fn write_text(path: &Path, text: &str) -> CliResult<bool> {
    if let Err(e) = fs::write(path, text) {
        if path.exists() {
            let _ = fs::remove_file(path);
        }
        return Err(CliError::io_error(format!("Failed to write {}: {}", path.display(), e)));
    }
    if text.is_empty() {
        log::warn!(
            "{}: {} is empty, removed",
            ErrorCode::EmptyOutputProduced.code(),
            path.display()
        );
        fs::remove_file(path)?;
        return Ok(false);
    }
    Ok(true)
}
