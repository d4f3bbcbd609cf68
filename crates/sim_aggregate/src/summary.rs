//! Aggregate statistics table.

/// Distribution summary of one asset's simulated final prices.
///
/// All values are rounded to two decimals.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetSummary {
    /// Asset name
    pub asset: String,
    /// Mean simulated price
    pub mean: f64,
    /// Sample standard deviation (n − 1)
    pub std_dev: f64,
    /// 5th percentile (linear interpolation)
    pub p5: f64,
    /// 95th percentile (linear interpolation)
    pub p95: f64,
}

/// One [`AssetSummary`] per asset, in input column order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregateTable {
    rows: Vec<AssetSummary>,
    n_trials: usize,
    n_tables: usize,
}

impl AggregateTable {
    pub(crate) fn new(rows: Vec<AssetSummary>, n_trials: usize, n_tables: usize) -> Self {
        Self {
            rows,
            n_trials,
            n_tables,
        }
    }

    /// Returns the per-asset rows.
    #[inline]
    pub fn rows(&self) -> &[AssetSummary] {
        &self.rows
    }

    /// Looks up an asset's summary by name.
    pub fn get(&self, asset: &str) -> Option<&AssetSummary> {
        self.rows.iter().find(|r| r.asset == asset)
    }

    /// Returns the total number of trials summarised.
    #[inline]
    pub fn n_trials(&self) -> usize {
        self.n_trials
    }

    /// Returns the number of worker tables combined.
    #[inline]
    pub fn n_tables(&self) -> usize {
        self.n_tables
    }
}
