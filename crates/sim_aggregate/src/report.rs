//! Fixed-width text rendering of an [`AggregateTable`].
//!
//! Layout: a header line followed by one line per asset. The first column
//! holds the asset name, left-aligned and as wide as the longest name. Each
//! statistic column is right-aligned in a field of [`COLUMN_WIDTH`]
//! characters, separated by a single space, and printed with two decimals.
//!
//! ```text
//!             Mean price [$]            Std Dev [$]        5% quantile [$]       95% quantile [$]
//! AAPL                100.02                   3.11                  94.97                 105.12
//! ```

use std::fmt::Write as _;

use crate::summary::AggregateTable;

/// Minimum width of every statistic column.
pub const COLUMN_WIDTH: usize = 23;

/// Column headers, in output order.
pub const HEADERS: [&str; 4] = [
    "Mean price [$]",
    "Std Dev [$]",
    "5% quantile [$]",
    "95% quantile [$]",
];

/// Renders the report, terminated by a newline.
///
/// # Examples
///
/// ```rust
/// use sim_aggregate::{aggregate, render_report};
/// use sim_paths::TrialResultTable;
///
/// let table = TrialResultTable::from_rows(
///     vec!["AAPL".to_string()],
///     vec![vec![99.0], vec![101.0]],
/// )
/// .unwrap();
///
/// let report = render_report(&aggregate(&[table]).unwrap());
/// assert!(report.lines().next().unwrap().ends_with("95% quantile [$]"));
/// assert!(report.lines().nth(1).unwrap().starts_with("AAPL"));
/// ```
pub fn render_report(table: &AggregateTable) -> String {
    let label_width = table
        .rows()
        .iter()
        .map(|r| r.asset.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();

    out.push_str(&" ".repeat(label_width));
    for header in HEADERS {
        // Writing to a String cannot fail.
        let _ = write!(out, " {:>width$}", header, width = COLUMN_WIDTH);
    }
    out.push('\n');

    for row in table.rows() {
        let _ = write!(out, "{:<width$}", row.asset, width = label_width);
        for value in [row.mean, row.std_dev, row.p5, row.p95] {
            let _ = write!(out, " {:>width$.2}", value, width = COLUMN_WIDTH);
        }
        out.push('\n');
    }

    out
}
