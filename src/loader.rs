//! Diary extract loading
//!
//! Reads the respondent-activity extract from CSV or Parquet into Arrow
//! batches, projects and casts the required columns to their canonical names
//! and types, applies the sex filter and deserializes the surviving rows into
//! [`DiaryRecord`]s with `serde_arrow`.

use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array};
use arrow::compute::cast;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::{debug, info};
use parquet::arrow::ProjectionMask;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rayon::prelude::*;

use crate::config::{BalanceConfig, ColumnMap};
use crate::error::util::safe_open_file;
use crate::error::{BalanceError, Result};
use crate::filter::filter_by_sex;
use crate::models::DiaryRecord;
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Arrow type of each canonical field, aligned with [`DiaryRecord::FIELDS`]
const FIELD_TYPES: [DataType; 11] = [
    DataType::Utf8,
    DataType::Float64,
    DataType::Int64,
    DataType::Int64,
    DataType::Int64,
    DataType::Int64,
    DataType::Int64,
    DataType::Int64,
    DataType::Int64,
    DataType::Utf8,
    DataType::Int64,
];

/// On-disk format of an extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated values with a header row
    Csv,
    /// Apache Parquet
    Parquet,
}

impl SourceFormat {
    /// Determine the format from the file extension
    ///
    /// # Errors
    /// Returns a data source error for an unrecognized extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("parquet" | "pq") => Ok(Self::Parquet),
            _ => Err(BalanceError::data_source(
                "unrecognized extract format, expected .csv or .parquet",
            )
            .with_path(path)),
        }
    }
}

/// Check that a file schema carries every required column
///
/// Runs before any row is read, so a header-only or zero-row file with
/// absent columns is still rejected.
///
/// # Errors
/// Returns a data source error naming the first absent column
pub fn require_columns(schema: &Schema, columns: &ColumnMap) -> Result<()> {
    match columns
        .required()
        .into_iter()
        .find(|name| schema.index_of(name).is_err())
    {
        Some(missing) => Err(BalanceError::missing_column(missing)),
        None => Ok(()),
    }
}

/// Read an extract into record batches
///
/// The file schema is checked with [`require_columns`] before any row is
/// read. Parquet files are projected to the required columns.
///
/// # Arguments
/// * `path` - CSV or Parquet file
/// * `columns` - Source column names to project
/// * `batch_size` - Rows per batch
pub fn read_batches(
    path: &Path,
    columns: &ColumnMap,
    batch_size: usize,
) -> Result<Vec<RecordBatch>> {
    let read_error = |e: &dyn std::fmt::Display| {
        BalanceError::data_source(format!("failed to read extract: {e}")).with_path(path)
    };

    match SourceFormat::from_path(path)? {
        SourceFormat::Csv => {
            let mut file = safe_open_file(path, "reading diary extract")?;
            let (schema, _) = Format::default()
                .with_header(true)
                .infer_schema(&mut file, None)
                .map_err(|e| read_error(&e))?;
            require_columns(&schema, columns).map_err(|e| e.with_path(path))?;
            file.rewind()?;

            let reader = ReaderBuilder::new(Arc::new(schema))
                .with_header(true)
                .with_batch_size(batch_size)
                .build(file)
                .map_err(|e| read_error(&e))?;
            reader
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| read_error(&e))
        }
        SourceFormat::Parquet => {
            let file = safe_open_file(path, "reading diary extract")?;
            let builder =
                ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| read_error(&e))?;

            let file_schema = builder.schema().clone();
            require_columns(&file_schema, columns).map_err(|e| e.with_path(path))?;
            let mut projection: Vec<usize> = columns
                .required()
                .iter()
                .filter_map(|name| file_schema.index_of(name).ok())
                .collect();
            projection.sort_unstable();
            projection.dedup();
            let mask = ProjectionMask::roots(builder.parquet_schema(), projection);

            let reader = builder
                .with_projection(mask)
                .with_batch_size(batch_size)
                .build()
                .map_err(|e| read_error(&e))?;
            reader
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| read_error(&e))
        }
    }
}

/// Project, cast and rename the required columns of a batch
///
/// The result has exactly the columns of [`DiaryRecord::FIELDS`], in order.
/// Values that cannot be parsed as the canonical type become nulls, which
/// [`check_nulls`] reports once the batch is filtered.
///
/// # Errors
/// Returns a data source error naming the source column if it is absent
pub fn canonicalize_batch(batch: &RecordBatch, columns: &ColumnMap) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields = Vec::with_capacity(FIELD_TYPES.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(FIELD_TYPES.len());

    for ((source, canonical), target) in columns
        .required()
        .into_iter()
        .zip(DiaryRecord::FIELDS)
        .zip(FIELD_TYPES.iter())
    {
        let index = schema
            .index_of(source)
            .map_err(|_| BalanceError::missing_column(source))?;
        let array = convert_column(batch.column(index), target)?;
        fields.push(Field::new(canonical, target.clone(), true));
        arrays.push(array);
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

/// Cast a column to its canonical type
///
/// Floating-point identifiers and codes pass through `Int64` first so that
/// `10101.0` becomes the text `10101`.
fn convert_column(array: &ArrayRef, target: &DataType) -> Result<ArrayRef> {
    if array.data_type() == target {
        return Ok(Arc::clone(array));
    }
    if *target == DataType::Utf8 && array.data_type().is_floating() {
        let integral = cast(array, &DataType::Int64)?;
        return Ok(cast(&integral, target)?);
    }
    Ok(cast(array, target)?)
}

/// Reject missing or unparseable values in the required columns
///
/// # Errors
/// Returns a data source error naming the first source column with nulls
pub fn check_nulls(batch: &RecordBatch, columns: &ColumnMap) -> Result<()> {
    for (source, array) in columns.required().into_iter().zip(batch.columns()) {
        if array.null_count() > 0 {
            return Err(BalanceError::data_source(format!(
                "column '{source}' has {} missing or unparseable values",
                array.null_count()
            )));
        }
    }
    Ok(())
}

/// Check value ranges the pipeline relies on
///
/// # Errors
/// Returns a data source error naming the source column and the row
fn validate_batch(batch: &RecordBatch, columns: &ColumnMap) -> Result<()> {
    let column = |name: &str| {
        batch
            .column_by_name(name)
            .ok_or_else(|| BalanceError::missing_column(name))
    };

    let weights = column("person_weight")?;
    if let Some(weights) = weights.as_any().downcast_ref::<Float64Array>() {
        if let Some(i) = weights.values().iter().position(|w| !(w.is_finite() && *w > 0.0)) {
            return Err(BalanceError::data_source(format!(
                "column '{}' has non-positive weight {} at row {i}",
                columns.person_weight,
                weights.value(i)
            )));
        }
    }

    let durations = column("duration_minutes")?;
    if let Some(durations) = durations.as_any().downcast_ref::<Int64Array>() {
        if let Some(i) = durations.values().iter().position(|d| *d < 0) {
            return Err(BalanceError::data_source(format!(
                "column '{}' has negative duration {} at row {i}",
                columns.duration,
                durations.value(i)
            )));
        }
    }

    Ok(())
}

/// Turn one raw batch into diary records of the requested sex
fn records_from_batch(batch: &RecordBatch, config: &BalanceConfig) -> Result<Vec<DiaryRecord>> {
    let canonical = canonicalize_batch(batch, &config.columns)?;
    let filtered = filter_by_sex(&canonical, "sex", config.sex)?;
    check_nulls(&filtered, &config.columns)?;
    validate_batch(&filtered, &config.columns)?;
    Ok(serde_arrow::from_record_batch::<Vec<DiaryRecord>>(&filtered)?)
}

/// Load the diary records of one sex from an extract
///
/// # Arguments
/// * `path` - CSV or Parquet extract
/// * `config` - Sex, column mapping, batch size and parallelism
///
/// # Returns
/// Records of the requested sex in file order
///
/// # Errors
/// Returns a data source error if the file cannot be read, a required column
/// is absent, or a value is missing, unparseable or out of range
pub fn load_diary_records(path: &Path, config: &BalanceConfig) -> Result<Vec<DiaryRecord>> {
    let start = Instant::now();
    log_operation_start("Loading diary extract", path);

    let batches = read_batches(path, &config.columns, config.batch_size.max(1))?;
    let total_rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
    debug!("Read {} batches with {total_rows} rows", batches.len());

    let per_batch = if config.parallel {
        batches
            .par_iter()
            .map(|batch| records_from_batch(batch, config))
            .collect::<Result<Vec<_>>>()
    } else {
        batches
            .iter()
            .map(|batch| records_from_batch(batch, config))
            .collect::<Result<Vec<_>>>()
    };
    let per_batch = per_batch.map_err(|e| e.with_path(path))?;

    let records: Vec<DiaryRecord> = per_batch.into_iter().flatten().collect();
    if records.is_empty() {
        log_warning(
            &format!("No rows with sex code {} in extract", config.sex),
            Some(path),
        );
    }

    info!(
        "Kept {} of {total_rows} rows with sex code {}",
        records.len(),
        config.sex
    );
    log_operation_complete("loaded", path, records.len(), Some(start.elapsed()));
    Ok(records)
}
