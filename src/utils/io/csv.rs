//! CSV rendering through the Arrow CSV writer.

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::csv::Writer;
use arrow::record_batch::RecordBatch;
use arrow_schema::{DataType, Field, Schema};

use crate::algorithm::balance::BalanceTable;
use crate::error::{BalanceError, Result};

/// Header of the row-label column
pub const LABEL_HEADER: &str = "Outcome";

/// Convert the table to a record batch of string columns
pub fn to_record_batch(table: &BalanceTable) -> Result<RecordBatch> {
    let mut fields = vec![Field::new(LABEL_HEADER, DataType::Utf8, false)];
    fields.extend(
        table
            .columns
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, false)),
    );

    let labels: ArrayRef = Arc::new(StringArray::from_iter_values(
        table.rows.iter().map(|r| r.display_label()),
    ));
    let mut columns = vec![labels];
    for j in 0..table.columns.len() {
        columns.push(Arc::new(StringArray::from_iter_values(
            table.rows.iter().map(|r| r.cells[j].as_str()),
        )));
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Render the table as CSV with a header row
pub fn to_csv(table: &BalanceTable) -> Result<String> {
    let batch = to_record_batch(table)?;
    let mut writer = Writer::new(Vec::new());
    writer.write(&batch)?;
    String::from_utf8(writer.into_inner())
        .map_err(|e| BalanceError::Serialization(format!("CSV output is not UTF-8: {e}")))
}
