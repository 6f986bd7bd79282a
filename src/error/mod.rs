//! Error handling for balance table generation.

use std::path::{Path, PathBuf};

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

pub mod util;

/// Specialized error type for the balance pipeline
#[derive(Debug, thiserror::Error)]
pub enum BalanceError {
    /// The input source cannot be read, or lacks a required column or value
    #[error("Data source error{}: {message}", path_suffix(.path))]
    DataSource {
        /// What went wrong
        message: String,
        /// File the error relates to, when known
        path: Option<PathBuf>,
    },

    /// A category's regression cannot be fit
    #[error("Estimation error for category '{category}': {reason}")]
    Estimation {
        /// Display label of the failing category
        category: String,
        /// Why the fit failed
        reason: String,
    },

    /// A numeric value cannot be rendered into the table
    #[error("Format error: {quantity} has non-finite value {value}")]
    Format {
        /// Which table quantity failed to render
        quantity: String,
        /// The offending value
        value: f64,
    },

    /// Error opening, reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error processing Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error converting records to or from a serialized form
    #[error("Serialization error: {0}")]
    Serialization(String),
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" ({})", p.display()))
        .unwrap_or_default()
}

impl BalanceError {
    /// Create a data source error without file context
    pub fn data_source(message: impl Into<String>) -> Self {
        Self::DataSource {
            message: message.into(),
            path: None,
        }
    }

    /// Create a data source error for a missing required column
    pub fn missing_column(column: &str) -> Self {
        Self::data_source(format!("required column '{column}' is absent"))
    }

    /// Create an estimation error naming the category
    pub fn estimation(category: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Estimation {
            category: category.into(),
            reason: reason.into(),
        }
    }

    /// Attach a file path to a data source error; other variants pass through
    #[must_use]
    pub fn with_path(self, path: &Path) -> Self {
        match self {
            Self::DataSource { message, .. } => Self::DataSource {
                message,
                path: Some(path.to_path_buf()),
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for BalanceError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<serde_arrow::Error> for BalanceError {
    fn from(error: serde_arrow::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Result type for balance pipeline operations
pub type Result<T> = std::result::Result<T, BalanceError>;
