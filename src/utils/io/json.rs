//! JSON rendering of the structured table.

use crate::algorithm::balance::BalanceTable;
use crate::error::Result;

/// Render the table as pretty-printed JSON
pub fn to_json(table: &BalanceTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(table)?)
}
