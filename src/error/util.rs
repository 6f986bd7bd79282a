//! Utility functions for error handling
//!
//! This module provides utility functions to make error handling more convenient.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{BalanceError, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
///
/// # Returns
/// * `Result<fs::File>` - The opened file or a data source error
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(
            BalanceError::data_source(format!("file not found, needed for: {purpose}"))
                .with_path(path),
        );
    }

    if !path.is_file() {
        return Err(
            BalanceError::data_source(format!("path is not a file, expected a file for: {purpose}"))
                .with_path(path),
        );
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                "permission denied - check file permissions".to_string()
            }
            _ => format!("failed to open file for {purpose}: {e}"),
        };
        BalanceError::data_source(context).with_path(path)
    })
}

/// Write a rendered document to disk in one call
///
/// The parent directory must already exist; nothing is created on failure.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(BalanceError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("output directory does not exist: {}", parent.display()),
            )));
        }
    }
    fs::write(path, contents)?;
    Ok(())
}
