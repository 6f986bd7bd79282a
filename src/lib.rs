//! Time-use balance tables from American Time Use Survey extracts.
//!
//! Compares how respondents with and without a young child spend their day
//! across six activity categories, with weighted regressions and HC3 robust
//! standard errors, and renders the comparison as a balance table.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod utils;

// Core types
pub use config::{BalanceConfig, ColumnMap};
pub use error::{BalanceError, Result};
pub use models::{ChildGroup, DiaryRecord, Respondent};

// Pipeline stages
pub use algorithm::aggregation::{DurationGrid, SampleSizes, aggregate_durations};
pub use algorithm::balance::BalanceTable;
pub use algorithm::classification::{ClassificationAmbiguity, classify_respondents};
pub use algorithm::estimation::{CategoryEstimate, estimate_categories};
pub use algorithm::taxonomy::{Category, classify_activity};
pub use loader::load_diary_records;
pub use pipeline::{BalanceOutcome, run, run_from_records, run_to_file};

// Export
pub use utils::io::{OutputFormat, render};
