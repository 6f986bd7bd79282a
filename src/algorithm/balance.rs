//! Balance table assembly
//!
//! Stacks per-category estimates into the display table: two rows per
//! category (a mean row and a parenthesized standard-error row) followed by
//! a sample-size row. Cells are text; all numeric formatting happens here.

use std::fmt;

use log::info;
use serde::Serialize;

use crate::algorithm::aggregation::SampleSizes;
use crate::algorithm::estimation::CategoryEstimate;
use crate::algorithm::estimation::significance::{
    format_coefficient, format_standard_error, format_value,
};
use crate::error::Result;

/// Column headers of the balance table
pub const COLUMN_HEADERS: [&str; 4] = [
    "Mean without kids",
    "Mean with kids",
    "Difference (hours)",
    "Difference with controls",
];

/// Label of the sample-size row
pub const SAMPLE_SIZE_LABEL: &str = "N";

/// Placeholder for cells with no value
pub const PLACEHOLDER: &str = "-";

/// What a table row holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Means and differences, with significance markers on differences
    Mean,
    /// Parenthesized standard errors of the row above
    StandardError,
    /// Respondents per comparison group
    SampleSize,
}

/// One physical row of the balance table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    /// Category name, or `N` for the sample-size row
    pub label: String,
    /// What the row holds
    pub kind: RowKind,
    /// Cell text, one per column
    pub cells: [String; 4],
}

impl TableRow {
    /// Label as printed: standard-error rows are unlabeled
    #[must_use]
    pub fn display_label(&self) -> &str {
        match self.kind {
            RowKind::StandardError => "",
            RowKind::Mean | RowKind::SampleSize => &self.label,
        }
    }
}

/// The assembled balance table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceTable {
    /// Column headers
    pub columns: [String; 4],
    /// Rows in category-encounter order, sample-size row last
    pub rows: Vec<TableRow>,
}

impl BalanceTable {
    /// Assemble the table from estimates in category-encounter order
    ///
    /// # Errors
    /// Returns a format error if any estimate is not finite.
    pub fn assemble(estimates: &[CategoryEstimate], sizes: SampleSizes) -> Result<Self> {
        let mut rows = Vec::with_capacity(estimates.len() * 2 + 1);

        for estimate in estimates {
            let (mean, se) = category_rows(estimate)?;
            rows.push(mean);
            rows.push(se);
        }

        rows.push(TableRow {
            label: SAMPLE_SIZE_LABEL.to_string(),
            kind: RowKind::SampleSize,
            cells: [
                sizes.without_child.to_string(),
                sizes.with_child.to_string(),
                PLACEHOLDER.to_string(),
                PLACEHOLDER.to_string(),
            ],
        });

        info!(
            "Assembled balance table with {} categories (N = {} without, {} with young child)",
            estimates.len(),
            sizes.without_child,
            sizes.with_child
        );

        Ok(Self {
            columns: COLUMN_HEADERS.map(str::to_string),
            rows,
        })
    }

    /// Find the mean row of a category by label
    #[must_use]
    pub fn mean_row(&self, label: &str) -> Option<&TableRow> {
        self.rows
            .iter()
            .find(|r| r.kind == RowKind::Mean && r.label == label)
    }

    /// Find the standard-error row of a category by label
    #[must_use]
    pub fn standard_error_row(&self, label: &str) -> Option<&TableRow> {
        self.rows
            .iter()
            .find(|r| r.kind == RowKind::StandardError && r.label == label)
    }

    /// The trailing sample-size row
    #[must_use]
    pub fn sample_size_row(&self) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.kind == RowKind::SampleSize)
    }

    /// Category labels in table order
    pub fn category_labels(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter(|r| r.kind == RowKind::Mean)
            .map(|r| r.label.as_str())
    }
}

fn category_rows(estimate: &CategoryEstimate) -> Result<(TableRow, TableRow)> {
    let name = estimate.category.display_name();
    let quantity = |what: &str| format!("{what} for {name}");

    let mean = TableRow {
        label: name.to_string(),
        kind: RowKind::Mean,
        cells: [
            format_value(estimate.mean_without_child, &quantity("mean without kids"))?,
            format_value(estimate.mean_with_child, &quantity("mean with kids"))?,
            format_coefficient(
                estimate.difference,
                estimate.difference_p,
                &quantity("difference"),
            )?,
            format_coefficient(
                estimate.adjusted_difference,
                estimate.adjusted_p,
                &quantity("difference with controls"),
            )?,
        ],
    };

    let se = TableRow {
        label: name.to_string(),
        kind: RowKind::StandardError,
        cells: [
            format_standard_error(estimate.se_without_child, &quantity("SE without kids"))?,
            format_standard_error(estimate.se_with_child, &quantity("SE with kids"))?,
            format_standard_error(estimate.difference_se, &quantity("SE of difference"))?,
            format_standard_error(
                estimate.adjusted_se,
                &quantity("SE of difference with controls"),
            )?,
        ],
    };

    Ok((mean, se))
}

impl fmt::Display for BalanceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self
            .rows
            .iter()
            .map(|r| r.display_label().len())
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = (0..4)
            .map(|j| {
                self.rows
                    .iter()
                    .map(|r| r.cells[j].len())
                    .chain(std::iter::once(self.columns[j].len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:<label_width$}", "")?;
        for (header, &width) in self.columns.iter().zip(&widths) {
            write!(f, "  {header:>width$}")?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(f, "{:<label_width$}", row.display_label())?;
            for (cell, &width) in row.cells.iter().zip(&widths) {
                write!(f, "  {cell:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
