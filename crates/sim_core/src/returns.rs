//! Log-return statistics of a historical price table.
//!
//! For consecutive rows the log-return is `ln(1 + pct_change)`, which equals
//! `ln(p[t] / p[t-1])`. Per asset:
//!
//! ```text
//! drift      = mean(r) − 0.5 · var(r)
//! volatility = std(r)
//! ```
//!
//! with sample (n − 1) estimators. The time step is one row (one trading
//! day); nothing is annualised.

use crate::covariance::CovarianceMatrix;
use crate::error::{Result, SimError};
use crate::history::PriceHistory;
use crate::stats::{mean, sample_variance};

/// Computes per-asset log-returns between consecutive rows.
///
/// Returns one series per asset (column-major), each of length
/// `n_rows − 1`.
///
/// # Errors
///
/// `SimError::InsufficientHistory` if the table has fewer than two rows.
///
/// # Examples
///
/// ```rust
/// use sim_core::history::PriceHistory;
/// use sim_core::returns::log_returns;
///
/// let history = PriceHistory::single_asset("A", &[100.0, 110.0]).unwrap();
/// let returns = log_returns(&history).unwrap();
/// assert!((returns[0][0] - 1.1_f64.ln()).abs() < 1e-15);
/// ```
pub fn log_returns(history: &PriceHistory) -> Result<Vec<Vec<f64>>> {
    let rows = history.n_rows();
    if rows < 2 {
        return Err(SimError::InsufficientHistory { rows });
    }

    let returns = (0..history.n_assets())
        .map(|asset| {
            let prices: Vec<f64> = history.column(asset).collect();
            prices
                .windows(2)
                .map(|w| {
                    let pct_change = w[1] / w[0] - 1.0;
                    pct_change.ln_1p()
                })
                .collect()
        })
        .collect();

    Ok(returns)
}

/// Drift, volatility and covariance of historical log-returns.
///
/// # Examples
///
/// ```rust
/// use sim_core::history::PriceHistory;
/// use sim_core::returns::ReturnStatistics;
///
/// let history = PriceHistory::from_rows(
///     vec!["A".to_string(), "B".to_string()],
///     vec![vec![100.0, 50.0], vec![101.0, 49.0], vec![103.0, 50.5]],
/// )
/// .unwrap();
///
/// let stats = ReturnStatistics::from_history(&history).unwrap();
/// assert_eq!(stats.n_assets(), 2);
/// assert_eq!(stats.covariance().dim(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReturnStatistics {
    /// Asset names in column order.
    assets: Vec<String>,
    /// Mean log-return per asset.
    mean: Vec<f64>,
    /// `mean − 0.5 · variance` per asset.
    drift: Vec<f64>,
    /// Standard deviation of log-returns per asset.
    volatility: Vec<f64>,
    /// Sample covariance of log-returns across assets.
    covariance: CovarianceMatrix,
    /// Number of return observations used.
    n_observations: usize,
}

impl ReturnStatistics {
    /// Derives return statistics from a price table.
    ///
    /// # Errors
    ///
    /// `SimError::InsufficientHistory` if the table has fewer than two rows.
    pub fn from_history(history: &PriceHistory) -> Result<Self> {
        let returns = log_returns(history)?;
        let n_observations = history.n_rows() - 1;

        let mut means = Vec::with_capacity(returns.len());
        let mut drift = Vec::with_capacity(returns.len());
        let mut volatility = Vec::with_capacity(returns.len());

        for series in &returns {
            // Both are Some: every series has n_rows - 1 >= 1 elements.
            let mu = mean(series).unwrap_or(0.0);
            let var = sample_variance(series).unwrap_or(0.0);
            means.push(mu);
            drift.push(mu - 0.5 * var);
            volatility.push(var.sqrt());
        }

        let covariance = CovarianceMatrix::from_series(&returns)?;

        Ok(Self {
            assets: history.assets().to_vec(),
            mean: means,
            drift,
            volatility,
            covariance,
            n_observations,
        })
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

    /// Returns the mean log-return per asset.
    #[inline]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Returns the drift per asset.
    #[inline]
    pub fn drift(&self) -> &[f64] {
        &self.drift
    }

    /// Returns the volatility per asset.
    #[inline]
    pub fn volatility(&self) -> &[f64] {
        &self.volatility
    }

    /// Returns the covariance matrix of log-returns.
    #[inline]
    pub fn covariance(&self) -> &CovarianceMatrix {
        &self.covariance
    }

    /// Returns the number of return observations (rows − 1).
    #[inline]
    pub fn n_observations(&self) -> usize {
        self.n_observations
    }
}
