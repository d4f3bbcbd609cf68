//! Configuration error types.

use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is absent from every source.
    #[error("Missing setting '{key}': set {env}, MCSIM_{upper} or --{flag}")]
    Missing {
        /// Setting name
        key: &'static str,
        /// Legacy environment variable
        env: &'static str,
        /// Upper-case setting name for the prefixed variable
        upper: &'static str,
        /// CLI flag
        flag: &'static str,
    },

    /// A setting is present but unusable.
    #[error("Invalid setting '{key}': {reason}")]
    Invalid {
        /// Setting name
        key: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Unknown log level name.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// The simulation parameters fail validation.
    #[error(transparent)]
    Simulation(#[from] sim_paths::ConfigError),

    /// A source could not be read or merged.
    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    /// Creates an `Invalid` error.
    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}
