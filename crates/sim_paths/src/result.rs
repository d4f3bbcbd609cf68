//! Trial result table: final simulated prices of one worker.

use sim_core::SimError;

/// Final prices of every trial, one row per trial and one column per asset.
///
/// Values are rounded to two decimals when produced by the simulator. The
/// table is immutable once built.
///
/// # Examples
///
/// ```rust
/// use sim_paths::result::TrialResultTable;
///
/// let table = TrialResultTable::from_rows(
///     vec!["AAPL".to_string()],
///     vec![vec![101.5], vec![99.25]],
/// )
/// .unwrap();
///
/// assert_eq!(table.n_trials(), 2);
/// assert_eq!(table.column(0).collect::<Vec<_>>(), vec![101.5, 99.25]);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialResultTable {
    /// Asset column names.
    assets: Vec<String>,
    /// Prices in row-major order (`trial * n_assets + asset`).
    values: Vec<f64>,
}

impl TrialResultTable {
    /// Builds a table from a flat row-major buffer.
    ///
    /// # Errors
    ///
    /// - `SimError::EmptyAssets` if `assets` is empty
    /// - `SimError::InvalidDimensions` if `values.len()` is not a multiple
    ///   of the asset count
    pub fn new(assets: Vec<String>, values: Vec<f64>) -> Result<Self, SimError> {
        if assets.is_empty() {
            return Err(SimError::EmptyAssets);
        }
        if values.len() % assets.len() != 0 {
            let rows = values.len() / assets.len() + 1;
            return Err(SimError::InvalidDimensions {
                expected: rows * assets.len(),
                got: values.len(),
            });
        }
        Ok(Self { assets, values })
    }

    /// Builds a table from per-trial rows.
    ///
    /// # Errors
    ///
    /// `SimError::RaggedRow` if a row width differs from the asset count.
    pub fn from_rows(assets: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, SimError> {
        let n_assets = assets.len();
        let mut values = Vec::with_capacity(rows.len() * n_assets);
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != n_assets {
                return Err(SimError::RaggedRow {
                    row: row_idx,
                    got: row.len(),
                    expected: n_assets,
                });
            }
            values.extend(row);
        }
        Self::new(assets, values)
    }

    /// Returns the asset names.
    #[inline]
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// Returns the number of assets.
    #[inline]
    pub fn n_assets(&self) -> usize {
        self.assets.len()
    }

    /// Returns the number of trials (rows).
    #[inline]
    pub fn n_trials(&self) -> usize {
        self.values.len() / self.assets.len()
    }

    /// Returns one trial's prices.
    #[inline]
    pub fn row(&self, trial: usize) -> &[f64] {
        let n = self.n_assets();
        &self.values[trial * n..(trial + 1) * n]
    }

    /// Iterates over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.n_assets())
    }

    /// Iterates over one asset's prices.
    pub fn column(&self, asset: usize) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().skip(asset).step_by(self.n_assets()).copied()
    }

    /// Returns the flat row-major buffer.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Splits the table into consecutive row blocks of at most `rows` rows.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is zero.
    pub fn split_rows(&self, rows: usize) -> Vec<TrialResultTable> {
        assert!(rows > 0, "block size must be positive");
        self.values
            .chunks(rows * self.n_assets())
            .map(|chunk| TrialResultTable {
                assets: self.assets.clone(),
                values: chunk.to_vec(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_shape_accessors() {
        let table = TrialResultTable::new(names(&["A", "B"]), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();
        assert_eq!(table.n_trials(), 3);
        assert_eq!(table.n_assets(), 2);
        assert_eq!(table.row(1), &[3.0, 4.0]);
        assert_eq!(table.column(1).collect::<Vec<_>>(), vec![2.0, 4.0, 6.0]);
        assert_eq!(table.rows().count(), 3);
    }

    #[test]
    fn test_empty_assets_rejected() {
        assert_eq!(
            TrialResultTable::new(vec![], vec![]),
            Err(SimError::EmptyAssets)
        );
    }

    #[test]
    fn test_partial_row_rejected() {
        let result = TrialResultTable::new(names(&["A", "B"]), vec![1.0, 2.0, 3.0]);
        assert_eq!(
            result,
            Err(SimError::InvalidDimensions {
                expected: 4,
                got: 3
            })
        );
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = TrialResultTable::from_rows(names(&["A"]), vec![vec![1.0], vec![1.0, 2.0]]);
        assert!(matches!(result, Err(SimError::RaggedRow { row: 1, .. })));
    }

    #[test]
    fn test_zero_rows_allowed() {
        let table = TrialResultTable::from_rows(names(&["A"]), vec![]).unwrap();
        assert_eq!(table.n_trials(), 0);
    }

    #[test]
    fn test_split_rows() {
        let table =
            TrialResultTable::from_rows(names(&["A"]), (0..10).map(|i| vec![i as f64]).collect())
                .unwrap();
        let parts = table.split_rows(4);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].n_trials(), 4);
        assert_eq!(parts[2].n_trials(), 2);
        assert_eq!(parts[2].row(1), &[9.0]);
    }
}
