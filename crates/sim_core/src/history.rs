//! Historical price table.
//!
//! [`PriceHistory`] holds one column per asset and one row per trading day,
//! in ascending date order. Prices are stored row-major in a single
//! contiguous buffer: `prices[row * n_assets + asset]`.
//!
//! Construction validates the table once so that downstream kernels can
//! assume every price is finite and strictly positive.

use std::collections::HashSet;

use crate::error::{Result, SimError};

/// Validated historical price table (rows = dates, columns = assets).
///
/// # Invariants
///
/// - At least one asset column, every name non-empty and unique
/// - At least one row; every row has exactly `n_assets` values
/// - Every price is finite and strictly positive
///
/// Two or more rows are needed to compute returns; that requirement is
/// enforced by [`crate::returns`] rather than here, so that short tables can
/// still be loaded and reported on.
///
/// # Examples
///
/// ```rust
/// use sim_core::history::PriceHistory;
///
/// let history = PriceHistory::from_rows(
///     vec!["AAPL".to_string(), "MSFT".to_string()],
///     vec![vec![100.0, 200.0], vec![101.0, 198.0]],
/// )
/// .unwrap();
///
/// assert_eq!(history.n_rows(), 2);
/// assert_eq!(history.last_row(), &[101.0, 198.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceHistory {
    /// Asset column names, in input order.
    assets: Vec<String>,
    /// Row labels (typically dates); carried through, never interpreted.
    labels: Vec<String>,
    /// Prices in row-major order.
    prices: Vec<f64>,
}

impl PriceHistory {
    /// Builds a table with labelled rows.
    ///
    /// # Errors
    ///
    /// - `SimError::EmptyAssets` if `assets` is empty
    /// - `SimError::UnnamedAsset` / `SimError::DuplicateAsset` for bad headers
    /// - `SimError::InsufficientHistory` if `rows` is empty
    /// - `SimError::InvalidDimensions` if `labels` and `rows` differ in length
    /// - `SimError::RaggedRow` if a row has the wrong width
    /// - `SimError::InvalidPrice` for non-finite or non-positive prices
    pub fn new(assets: Vec<String>, labels: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        validate_header(&assets)?;

        if rows.is_empty() {
            return Err(SimError::InsufficientHistory { rows: 0 });
        }
        if labels.len() != rows.len() {
            return Err(SimError::InvalidDimensions {
                expected: rows.len(),
                got: labels.len(),
            });
        }

        let n_assets = assets.len();
        let mut prices = Vec::with_capacity(rows.len() * n_assets);

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != n_assets {
                return Err(SimError::RaggedRow {
                    row: row_idx,
                    got: row.len(),
                    expected: n_assets,
                });
            }
            for (asset_idx, &value) in row.iter().enumerate() {
                if !(value.is_finite() && value > 0.0) {
                    return Err(SimError::InvalidPrice {
                        asset: assets[asset_idx].clone(),
                        row: row_idx,
                        value,
                    });
                }
            }
            prices.extend(row);
        }

        Ok(Self {
            assets,
            labels,
            prices,
        })
    }

    /// Builds a table whose row labels are the zero-based row indices.
    pub fn from_rows(assets: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let labels = (0..rows.len()).map(|i| i.to_string()).collect();
        Self::new(assets, labels, rows)
    }

    /// Builds a one-asset table from a price series.
    pub fn single_asset(name: impl Into<String>, prices: &[f64]) -> Result<Self> {
        let rows = prices.iter().map(|&p| vec![p]).collect();
        Self::from_rows(vec![name.into()], rows)
    }

    /// Returns the number of rows (trading days).
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.labels.len()
    }

    /// Returns the number of asset columns.
    #[inline]
    pub fn n_assets(&self) -> usize {
        self.assets.len()
    }

    /// Returns the asset names in column order.
    #[inline]
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// Returns the row labels.
    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the prices of one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= n_rows()`.
    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        let n = self.n_assets();
        &self.prices[row * n..(row + 1) * n]
    }

    /// Returns the last observed price of every asset.
    ///
    /// These seed time-step 0 of every simulated path.
    #[inline]
    pub fn last_row(&self) -> &[f64] {
        self.row(self.n_rows() - 1)
    }

    /// Iterates over the prices of one asset in date order.
    pub fn column(&self, asset: usize) -> impl Iterator<Item = f64> + '_ {
        let n = self.n_assets();
        self.prices.iter().skip(asset).step_by(n).copied()
    }

    /// Returns the column index of an asset by name.
    pub fn asset_index(&self, name: &str) -> Option<usize> {
        self.assets.iter().position(|a| a == name)
    }
}

/// Validates an asset header: non-empty, named, unique.
pub(crate) fn validate_header(assets: &[String]) -> Result<()> {
    if assets.is_empty() {
        return Err(SimError::EmptyAssets);
    }

    let mut seen = HashSet::with_capacity(assets.len());
    for (index, name) in assets.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(SimError::UnnamedAsset { index });
        }
        if !seen.insert(name.as_str()) {
            return Err(SimError::DuplicateAsset(name.clone()));
        }
    }
    Ok(())
}
