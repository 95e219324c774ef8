// ABOUTME: Utility functions for the his-poster application
// ABOUTME: Provides path validation, atomic file output and markup escaping

use crate::errors::{DeckError, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(DeckError::FileError)?;
    } else if !path.is_dir() {
        return Err(DeckError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a file's parent directory exists
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory_exists(parent),
        _ => Ok(()),
    }
}

/// Validate write permissions for a directory
pub fn validate_directory_writable(path: &Path) -> Result<()> {
    ensure_directory_exists(path)?;

    let test_file = path.join(format!("test_write_{}.tmp", uuid::Uuid::new_v4()));
    match fs::File::create(&test_file) {
        Ok(_) => {
            if let Err(e) = fs::remove_file(&test_file) {
                warn!("Failed to clean up test file {:?}: {}", test_file, e);
            }
            Ok(())
        }
        Err(e) => Err(DeckError::ValidationError(format!(
            "Directory is not writable: {:?} - {}",
            path, e
        ))),
    }
}

/// Get the absolute path
pub fn get_absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| {
        DeckError::ValidationError(format!("Failed to get absolute path for {:?}: {}", path, e))
    })
}

/// Write `data` to `path` in one step.
///
/// The bytes go to a hidden sibling file first and are renamed into place, so a
/// failed write never leaves a truncated document behind.
pub fn write_atomically(path: &Path, data: &[u8]) -> Result<()> {
    ensure_parent_directory_exists(path)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| DeckError::ValidationError(format!("Not a file path: {:?}", path)))?
        .to_string_lossy();
    let staging = path.with_file_name(format!(".{}.{}.part", file_name, uuid::Uuid::new_v4()));

    debug!("Staging {} bytes at {:?}", data.len(), staging);
    if let Err(e) = fs::write(&staging, data) {
        let _ = fs::remove_file(&staging);
        return Err(DeckError::FileError(e));
    }
    if let Err(e) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(DeckError::FileError(e));
    }
    Ok(())
}

/// Escape text for inclusion in HTML or XML markup.
pub fn escape_markup(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}
