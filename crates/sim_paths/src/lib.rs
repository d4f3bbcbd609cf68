//! # sim_paths: Path Simulation Kernel
//!
//! ## Kernel Role
//!
//! sim_paths turns a historical price table into simulated final prices:
//! - Run configuration with validation (`config`)
//! - Explicit, per-invocation random number generators (`rng`)
//! - Independent or correlated random shocks (`shocks`)
//! - Sequential GBM recurrence over a `[step, trial, asset]` array (`paths`)
//! - The worker's output table (`result`)
//! - The end-to-end simulator (`simulator`)
//!
//! ## Determinism
//!
//! None by default. Every batch invocation builds its generator with
//! [`rng::SimRng::from_entropy`], so repeated runs on the same inputs differ.
//! Seeded generators exist for tests and reproduction.
//!
//! ## Usage Example
//!
//! ```rust
//! use sim_core::history::PriceHistory;
//! use sim_paths::{PathSimulator, SimRng, SimulationConfig};
//!
//! let history = PriceHistory::from_rows(
//!     vec!["AAPL".to_string(), "MSFT".to_string()],
//!     vec![vec![180.0, 400.0], vec![182.0, 404.0], vec![181.0, 399.0]],
//! )
//! .unwrap();
//!
//! let config = SimulationConfig::builder().n_periods(20).n_trials(500).build().unwrap();
//! let table = PathSimulator::new(config)
//!     .simulate(&history, &mut SimRng::from_entropy())
//!     .unwrap();
//!
//! assert_eq!(table.n_trials(), 500);
//! assert_eq!(table.n_assets(), 2);
//! ```

#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod paths;
pub mod result;
pub mod rng;
pub mod shocks;
pub mod simulator;

pub use config::{ShockModel, SimulationConfig, SimulationConfigBuilder};
pub use error::{ConfigError, SimulationError};
pub use paths::PricePaths;
pub use result::TrialResultTable;
pub use rng::SimRng;
pub use simulator::PathSimulator;
