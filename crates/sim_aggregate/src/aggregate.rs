//! Reduction of worker tables to per-asset statistics.
//!
//! The tables are concatenated row-wise and each asset column is reduced
//! independently:
//! - mean
//! - sample standard deviation (n − 1)
//! - 5th and 95th percentiles, linear interpolation between closest ranks
//!
//! Every statistic is rounded to two decimals. Because the reduction only
//! sees the concatenated columns, splitting a table into several worker
//! tables never changes the result.

use sim_core::stats::{mean, percentile_sorted, round_to, sample_std_dev};
use sim_paths::TrialResultTable;
use tracing::{debug, info};

use crate::error::AggregateError;
use crate::summary::{AggregateTable, AssetSummary};

/// Decimal places of every reported statistic.
pub const SUMMARY_DECIMALS: u32 = 2;

/// Lower reported percentile.
pub const LOWER_PERCENTILE: f64 = 5.0;

/// Upper reported percentile.
pub const UPPER_PERCENTILE: f64 = 95.0;

/// Combines worker tables into an [`AggregateTable`].
///
/// By default any non-zero number of tables is accepted. With
/// [`Aggregator::with_expected_tables`] the aggregator also refuses to
/// summarise a partial job.
///
/// # Examples
///
/// ```rust
/// use sim_aggregate::Aggregator;
/// use sim_paths::TrialResultTable;
///
/// let table = TrialResultTable::from_rows(
///     vec!["AAPL".to_string()],
///     vec![vec![99.0], vec![100.0], vec![101.0]],
/// )
/// .unwrap();
///
/// let summary = Aggregator::new().aggregate(&[table]).unwrap();
/// assert_eq!(summary.get("AAPL").unwrap().mean, 100.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Aggregator {
    expected_tables: Option<usize>,
}

impl Aggregator {
    /// Creates an aggregator without a completeness check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires exactly `expected` tables.
    pub fn with_expected_tables(expected: usize) -> Self {
        Self {
            expected_tables: Some(expected),
        }
    }

    /// Returns the required table count, if any.
    #[inline]
    pub fn expected_tables(&self) -> Option<usize> {
        self.expected_tables
    }

    /// Aggregates the given tables.
    ///
    /// Tables whose columns are the first table's columns in another order
    /// are realigned before concatenation.
    ///
    /// # Errors
    ///
    /// - `AggregateError::EmptyInput` if `tables` is empty
    /// - `AggregateError::IncompleteInput` if an expected count is set and
    ///   not matched
    /// - `AggregateError::SchemaMismatch` if a table's column set differs
    ///   from the first table's
    /// - `AggregateError::NoTrials` if every table is empty
    pub fn aggregate(&self, tables: &[TrialResultTable]) -> Result<AggregateTable, AggregateError> {
        let first = tables.first().ok_or(AggregateError::EmptyInput)?;

        if let Some(expected) = self.expected_tables {
            if tables.len() != expected {
                return Err(AggregateError::IncompleteInput {
                    expected,
                    found: tables.len(),
                });
            }
        }

        let assets = first.assets();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); assets.len()];

        for (idx, table) in tables.iter().enumerate() {
            let mapping = column_mapping(assets, table.assets()).ok_or_else(|| {
                AggregateError::SchemaMismatch {
                    table: idx,
                    expected: assets.to_vec(),
                    found: table.assets().to_vec(),
                }
            })?;

            for (target, &source) in columns.iter_mut().zip(&mapping) {
                target.extend(table.column(source));
            }
            debug!(table = idx, trials = table.n_trials(), "Merged worker table");
        }

        let n_trials = columns.first().map_or(0, Vec::len);
        if n_trials == 0 {
            return Err(AggregateError::NoTrials {
                tables: tables.len(),
            });
        }

        let rows = assets
            .iter()
            .zip(columns.iter_mut())
            .map(|(asset, column)| summarise(asset, column))
            .collect();

        info!(
            tables = tables.len(),
            trials = n_trials,
            assets = assets.len(),
            "Aggregated simulation results"
        );

        Ok(AggregateTable::new(rows, n_trials, tables.len()))
    }
}

/// Aggregates tables without a completeness check.
///
/// Shorthand for `Aggregator::new().aggregate(tables)`.
///
/// # Errors
///
/// See [`Aggregator::aggregate`].
pub fn aggregate(tables: &[TrialResultTable]) -> Result<AggregateTable, AggregateError> {
    Aggregator::new().aggregate(tables)
}

/// Maps each reference column to its position in `found`.
///
/// Returns `None` unless `found` is a permutation of `reference`.
fn column_mapping(reference: &[String], found: &[String]) -> Option<Vec<usize>> {
    if reference.len() != found.len() {
        return None;
    }
    reference
        .iter()
        .map(|name| found.iter().position(|f| f == name))
        .collect()
}

/// Reduces one non-empty column; sorts it in place.
fn summarise(asset: &str, column: &mut [f64]) -> AssetSummary {
    let m = mean(column).unwrap_or(f64::NAN);
    let sd = sample_std_dev(column).unwrap_or(f64::NAN);
    column.sort_by(f64::total_cmp);

    AssetSummary {
        asset: asset.to_string(),
        mean: round_to(m, SUMMARY_DECIMALS),
        std_dev: round_to(sd, SUMMARY_DECIMALS),
        p5: round_to(percentile_sorted(column, LOWER_PERCENTILE), SUMMARY_DECIMALS),
        p95: round_to(percentile_sorted(column, UPPER_PERCENTILE), SUMMARY_DECIMALS),
    }
}
