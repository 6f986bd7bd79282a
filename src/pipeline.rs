//! End-to-end balance table pipeline
//!
//! load → classify → aggregate → estimate → assemble → render. Each stage is
//! a pure function of the previous stage's output, so the same input and
//! configuration always produce byte-identical documents.

use std::path::Path;
use std::time::Instant;

use log::info;

use crate::algorithm::aggregation::{SampleSizes, aggregate_durations};
use crate::algorithm::balance::BalanceTable;
use crate::algorithm::classification::{ClassificationAmbiguity, classify_respondents};
use crate::algorithm::estimation::{CategoryEstimate, estimate_categories};
use crate::config::BalanceConfig;
use crate::error::util::write_output;
use crate::error::{BalanceError, Result};
use crate::loader::load_diary_records;
use crate::models::DiaryRecord;
use crate::utils::io::{OutputFormat, render};

/// Everything a pipeline run produces
#[derive(Debug, Clone)]
pub struct BalanceOutcome {
    /// The assembled table
    pub table: BalanceTable,
    /// Per-category estimates in table order
    pub estimates: Vec<CategoryEstimate>,
    /// Respondents excluded from both comparison groups
    pub ambiguity: ClassificationAmbiguity,
    /// Respondents per comparison group
    pub sample_sizes: SampleSizes,
}

/// Build the balance table from already loaded diary records
///
/// # Errors
/// Returns a data source error if no respondent has a classified episode,
/// and propagates estimation and format errors
pub fn run_from_records(records: &[DiaryRecord], config: &BalanceConfig) -> Result<BalanceOutcome> {
    let classified = classify_respondents(records);
    let ambiguity = classified.ambiguity().clone();

    let grid = aggregate_durations(records, &classified);
    if grid.is_empty() {
        return Err(BalanceError::data_source(
            "no respondent of the selected sex has a classified activity episode",
        ));
    }

    let sample_sizes = grid.sample_sizes();
    let estimates = estimate_categories(&grid, config)?;
    let table = BalanceTable::assemble(&estimates, sample_sizes)?;

    Ok(BalanceOutcome {
        table,
        estimates,
        ambiguity,
        sample_sizes,
    })
}

/// Load an extract and build its balance table
pub fn run(input: &Path, config: &BalanceConfig) -> Result<BalanceOutcome> {
    let records = load_diary_records(input, config)?;
    run_from_records(&records, config)
}

/// Load an extract, build the table and write it to `output`
///
/// The document is rendered in full before the file is opened, so a failing
/// run leaves no partial output behind.
///
/// # Arguments
/// * `input` - CSV or Parquet extract
/// * `output` - Destination file; its parent directory must exist
/// * `format` - Output document format
/// * `config` - Pipeline configuration
pub fn run_to_file(
    input: &Path,
    output: &Path,
    format: OutputFormat,
    config: &BalanceConfig,
) -> Result<BalanceOutcome> {
    let start = Instant::now();
    let outcome = run(input, config)?;
    let document = render(&outcome.table, format)?;
    write_output(output, &document)?;
    info!(
        "Wrote {format} balance table to {} in {:?}",
        output.display(),
        start.elapsed()
    );
    Ok(outcome)
}
