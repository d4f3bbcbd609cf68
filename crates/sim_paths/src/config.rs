//! Path simulator configuration.
//!
//! This module provides the immutable [`SimulationConfig`] and its builder.
//! The simulator never reads global state: every run parameter travels in
//! this struct.

use super::error::ConfigError;

/// Maximum number of trials allowed per worker.
pub const MAX_TRIALS: usize = 10_000_000;

/// Maximum number of future periods allowed per path.
pub const MAX_PERIODS: usize = 100_000;

/// Maximum number of cells (periods × trials × assets) in one simulated
/// array. The shock and path buffers each hold this many `f64`.
pub const MAX_PATH_CELLS: usize = 250_000_000;

/// How multi-asset shocks are drawn.
///
/// Single-asset runs always use independent standard normals.
///
/// # Variants
///
/// - `SampleCovariance`: shocks ~ N(0, Σ) with Σ the sample covariance of
///   historical log-returns, then scaled by each asset's volatility. This is
///   the historical behaviour of the batch jobs.
/// - `Correlation`: shocks ~ N(0, R) with R the correlation matrix of Σ, so
///   that `volatility · shock` has covariance Σ exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShockModel {
    /// Multivariate normal with the sample covariance of log-returns.
    #[default]
    SampleCovariance,

    /// Multivariate normal with the correlation matrix of log-returns.
    Correlation,
}

impl std::str::FromStr for ShockModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "covariance" | "sample-covariance" | "sample_covariance" => {
                Ok(ShockModel::SampleCovariance)
            }
            "correlation" => Ok(ShockModel::Correlation),
            other => Err(ConfigError::InvalidParameter {
                name: "shock_model",
                value: format!("unknown shock model '{}', expected covariance or correlation", other),
            }),
        }
    }
}

impl std::fmt::Display for ShockModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShockModel::SampleCovariance => write!(f, "covariance"),
            ShockModel::Correlation => write!(f, "correlation"),
        }
    }
}

/// Path simulation configuration.
///
/// Immutable configuration specifying simulation parameters.
/// Use [`SimulationConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use sim_paths::config::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .n_periods(252)
///     .n_trials(10_000)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_periods(), 252);
/// assert_eq!(config.n_trials(), 10_000);
/// assert!(!config.parallel());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Number of future periods (time-steps including step 0).
    n_periods: usize,
    /// Number of independent trials.
    n_trials: usize,
    /// Multi-asset shock model.
    shock_model: ShockModel,
    /// Whether to update trials in parallel within a time-step.
    parallel: bool,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the number of future periods.
    #[inline]
    pub fn n_periods(&self) -> usize {
        self.n_periods
    }

    /// Returns the number of trials.
    #[inline]
    pub fn n_trials(&self) -> usize {
        self.n_trials
    }

    /// Returns the multi-asset shock model.
    #[inline]
    pub fn shock_model(&self) -> ShockModel {
        self.shock_model
    }

    /// Returns whether trials are updated in parallel within a time-step.
    #[inline]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_trials` is 0 or greater than [`MAX_TRIALS`]
    /// - `n_periods` is 0 or greater than [`MAX_PERIODS`]
    /// - `n_periods × n_trials` exceeds [`MAX_PATH_CELLS`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_trials == 0 || self.n_trials > MAX_TRIALS {
            return Err(ConfigError::InvalidTrialCount(self.n_trials));
        }
        if self.n_periods == 0 || self.n_periods > MAX_PERIODS {
            return Err(ConfigError::InvalidPeriodCount(self.n_periods));
        }
        self.validate_cells(1)
    }

    /// Number of cells in a path array for `n_assets` assets, or `None` on
    /// overflow.
    #[inline]
    pub fn path_cells(&self, n_assets: usize) -> Option<usize> {
        self.n_periods
            .checked_mul(self.n_trials)?
            .checked_mul(n_assets)
    }

    /// Checks that a run over `n_assets` assets fits in [`MAX_PATH_CELLS`].
    ///
    /// # Errors
    ///
    /// `ConfigError::PathTooLarge` if it does not.
    pub fn validate_cells(&self, n_assets: usize) -> Result<(), ConfigError> {
        match self.path_cells(n_assets) {
            Some(cells) if cells <= MAX_PATH_CELLS => Ok(()),
            cells => Err(ConfigError::PathTooLarge {
                cells: cells.unwrap_or(usize::MAX),
                max: MAX_PATH_CELLS,
            }),
        }
    }
}

/// Builder for [`SimulationConfig`].
///
/// # Examples
///
/// ```rust
/// use sim_paths::config::{ShockModel, SimulationConfig};
///
/// let config = SimulationConfig::builder()
///     .n_periods(30)
///     .n_trials(5_000)
///     .shock_model(ShockModel::Correlation)
///     .parallel(true)
///     .build()
///     .expect("valid config");
///
/// assert_eq!(config.shock_model(), ShockModel::Correlation);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    n_periods: Option<usize>,
    n_trials: Option<usize>,
    shock_model: ShockModel,
    parallel: bool,
}

impl SimulationConfigBuilder {
    /// Sets the number of future periods (in [1, 100_000]).
    #[inline]
    pub fn n_periods(mut self, n_periods: usize) -> Self {
        self.n_periods = Some(n_periods);
        self
    }

    /// Sets the number of trials (in [1, 10_000_000]).
    #[inline]
    pub fn n_trials(mut self, n_trials: usize) -> Self {
        self.n_trials = Some(n_trials);
        self
    }

    /// Sets the multi-asset shock model.
    #[inline]
    pub fn shock_model(mut self, shock_model: ShockModel) -> Self {
        self.shock_model = shock_model;
        self
    }

    /// Enables trial-axis parallelism within each time-step.
    #[inline]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_periods` not set or invalid
    /// - `n_trials` not set or invalid
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let n_periods = self.n_periods.ok_or(ConfigError::InvalidParameter {
            name: "n_periods",
            value: "must be specified".to_string(),
        })?;

        let n_trials = self.n_trials.ok_or(ConfigError::InvalidParameter {
            name: "n_trials",
            value: "must be specified".to_string(),
        })?;

        let config = SimulationConfig {
            n_periods,
            n_trials,
            shock_model: self.shock_model,
            parallel: self.parallel,
        };

        config.validate()?;
        Ok(config)
    }
}
