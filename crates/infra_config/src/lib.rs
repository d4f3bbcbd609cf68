//! # infra_config: Job Configuration
//!
//! Merges a TOML file, the batch-job environment and CLI flags into one
//! [`Settings`] value, then validates per command:
//! - [`Settings::simulate`] for a simulation worker
//! - [`Settings::collect`] for the aggregator
//!
//! ## Usage Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use infra_config::{ConfigSources, Settings};
//!
//! let env: HashMap<String, String> = [
//!     ("N_PERIODS", "30"),
//!     ("N_SIMS", "1000"),
//!     ("AWS_BUCKET", "results"),
//!     ("JOB_NAME", "nightly"),
//!     ("AWS_BATCH_JOB_ARRAY_INDEX", "3"),
//! ]
//! .iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//!
//! let settings = Settings::load(&ConfigSources { env, ..Default::default() }).unwrap();
//! let worker = settings.simulate().unwrap();
//! assert_eq!(worker.worker_index, 3);
//! assert_eq!(worker.simulation.n_trials(), 1000);
//! ```

#![deny(missing_docs)]

pub mod error;
pub mod level;
pub mod settings;

pub use error::ConfigError;
pub use level::LogLevel;
pub use settings::{
    CliOverrides, CollectSettings, ConfigSources, JobSettings, SimulateSettings, Settings,
    DEFAULT_STORE_ROOT, ENV_PREFIX,
};
