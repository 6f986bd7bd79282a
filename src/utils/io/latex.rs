//! LaTeX rendering in the booktabs style of a data-frame `to_latex` export.

use itertools::Itertools;

use crate::algorithm::balance::BalanceTable;

/// Escape LaTeX special characters
#[must_use]
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '\\' => out.push_str("\\textbackslash{}"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the table as a `tabular` environment
#[must_use]
pub fn to_latex(table: &BalanceTable) -> String {
    let column_spec = "l".repeat(table.columns.len() + 1);
    let header = format!(
        "{{}} & {} \\\\",
        table.columns.iter().map(|c| escape_latex(c)).join(" & ")
    );
    let body = table.rows.iter().map(|row| {
        format!(
            "{} & {} \\\\",
            escape_latex(row.display_label()),
            row.cells.iter().map(|c| escape_latex(c)).join(" & ")
        )
    });

    [
        format!("\\begin{{tabular}}{{{column_spec}}}"),
        "\\toprule".to_string(),
        header,
        "\\midrule".to_string(),
    ]
    .into_iter()
    .chain(body)
    .chain(["\\bottomrule".to_string(), "\\end{tabular}".to_string()])
    .map(|line| line + "\n")
    .collect()
}
