//! Error types for the path simulator.
//!
//! Configuration errors are raised when a [`crate::config::SimulationConfig`]
//! is built; simulation errors wrap them together with the statistics
//! failures from `sim_core`.

use sim_core::SimError;
use thiserror::Error;

/// Configuration error for the path simulator.
///
/// These errors occur during construction when invalid parameters are provided.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Trial count outside valid range [1, MAX_TRIALS].
    #[error("Invalid trial count {0}: must be in range [1, 10_000_000]")]
    InvalidTrialCount(usize),

    /// Period count outside valid range [1, MAX_PERIODS].
    #[error("Invalid period count {0}: must be in range [1, 100_000]")]
    InvalidPeriodCount(usize),

    /// Periods × trials × assets exceeds the per-array cell limit.
    #[error("Simulation too large: {cells} cells requested, at most {max} allowed")]
    PathTooLarge {
        /// Requested cell count (saturated on overflow).
        cells: usize,
        /// Configured limit.
        max: usize,
    },

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

/// Errors returned by [`crate::simulator::PathSimulator`].
#[derive(Error, Clone, Debug, PartialEq)]
pub enum SimulationError {
    /// Invalid simulator configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// History too short, malformed table or degenerate covariance.
    #[error(transparent)]
    Statistics(#[from] SimError),
}
