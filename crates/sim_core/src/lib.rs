//! # sim_core: Statistical Foundation for the Monte Carlo Simulator
//!
//! ## Layer 1 (Foundation) Role
//!
//! sim_core is the bottom layer of the workspace, providing:
//! - The historical price table (`history::PriceHistory`)
//! - Log-return statistics: drift, volatility, covariance (`returns`)
//! - Covariance matrices and their Cholesky factors (`covariance`)
//! - Descriptive statistics: mean, sample variance, percentiles (`stats`)
//! - Error types: `SimError` (`error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other workspace crates and only minimal
//! external dependencies:
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Example
//!
//! ```rust
//! use sim_core::history::PriceHistory;
//! use sim_core::returns::ReturnStatistics;
//!
//! let history = PriceHistory::single_asset("ACME", &[100.0, 102.0, 101.0, 105.0]).unwrap();
//! let stats = ReturnStatistics::from_history(&history).unwrap();
//!
//! assert_eq!(stats.n_assets(), 1);
//! assert!(stats.drift()[0].is_finite());
//! assert!(stats.volatility()[0] > 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod covariance;
pub mod error;
pub mod history;
pub mod returns;
pub mod stats;

pub use error::{Result, SimError};
