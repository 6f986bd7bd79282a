//! Row filtering for diary record batches
//!
//! Masks are computed with Arrow's vectorized comparison kernels and applied
//! column by column, so filtering never materializes rows.

use arrow::array::{ArrayRef, BooleanArray, Int64Array};
use arrow::compute::filter as arrow_filter;
use arrow::compute::kernels::cmp::eq;
use arrow::record_batch::RecordBatch;
use log::debug;

use crate::error::{BalanceError, Result};

/// Filter a record batch based on a boolean mask
///
/// # Arguments
/// * `batch` - The record batch to filter
/// * `mask` - The boolean mask indicating which rows to keep
///
/// # Returns
/// A new record batch with only rows where mask is true
///
/// # Errors
/// Returns an error if the mask length differs from the batch row count
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return Err(BalanceError::data_source(format!(
            "mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        )));
    }

    let filtered_columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|col| arrow_filter(col, mask))
        .collect::<arrow::error::Result<_>>()?;

    Ok(RecordBatch::try_new(batch.schema(), filtered_columns)?)
}

/// Build a mask selecting rows whose integer `column` equals `value`
///
/// Null cells never match.
///
/// # Errors
/// Returns an error if the column is absent or not of type `Int64`
pub fn equals_mask(batch: &RecordBatch, column: &str, value: i64) -> Result<BooleanArray> {
    let array = batch
        .column_by_name(column)
        .ok_or_else(|| BalanceError::missing_column(column))?;
    Ok(eq(array, &Int64Array::new_scalar(value))?)
}

/// Keep only the rows of the given sex
///
/// # Arguments
/// * `batch` - Batch with an `Int64` sex column
/// * `column` - Name of the sex column
/// * `sex` - Sex code to keep
///
/// # Errors
/// Returns an error if the sex column is absent or not an integer column
pub fn filter_by_sex(batch: &RecordBatch, column: &str, sex: i64) -> Result<RecordBatch> {
    let mask = equals_mask(batch, column, sex)?;
    let filtered = filter_record_batch(batch, &mask)?;
    debug!(
        "Sex filter kept {} of {} rows",
        filtered.num_rows(),
        batch.num_rows()
    );
    Ok(filtered)
}
