//! CLI error types.

use adapter_store::{CodecError, StoreError};
use infra_config::ConfigError;
use sim_aggregate::AggregateError;
use sim_paths::SimulationError;
use thiserror::Error;

/// Exit code for configuration errors.
pub const EXIT_CONFIG: u8 = 2;

/// Exit code for every other failure.
pub const EXIT_FAILURE: u8 = 1;

/// Errors surfaced by CLI commands.
#[derive(Error, Debug)]
pub enum CliError {
    /// Settings are missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage transfer or object decoding failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// A local input file is not a valid price table.
    #[error("Invalid input file: {0}")]
    Input(#[from] CodecError),

    /// The simulator rejected the input.
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    /// Worker tables could not be aggregated.
    #[error("Aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    /// Effective settings could not be rendered.
    #[error("Cannot render settings: {0}")]
    Render(#[from] toml::ser::Error),

    /// Local file I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(_) => EXIT_CONFIG,
            _ => EXIT_FAILURE,
        }
    }
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
