//! Table export
//!
//! Renders a [`BalanceTable`] to LaTeX, CSV or JSON. Rendering happens fully
//! in memory so that a failure never leaves a partial output file.

pub mod csv;
pub mod json;
pub mod latex;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::algorithm::balance::BalanceTable;
use crate::error::Result;

/// Output document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// booktabs `tabular` environment
    #[default]
    Latex,
    /// Comma-separated values with a header row
    Csv,
    /// Pretty-printed JSON of the structured table
    Json,
}

impl OutputFormat {
    /// Infer the format from a file extension, falling back to LaTeX
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tex" | "latex" => Ok(Self::Latex),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}' (expected tex, csv or json)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latex => write!(f, "tex"),
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Render a table in the given format
pub fn render(table: &BalanceTable, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Latex => Ok(latex::to_latex(table)),
        OutputFormat::Csv => csv::to_csv(table),
        OutputFormat::Json => json::to_json(table),
    }
}
