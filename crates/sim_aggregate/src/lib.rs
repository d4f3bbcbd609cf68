//! # sim_aggregate: Result Aggregation
//!
//! ## Kernel Role
//!
//! sim_aggregate combines the trial tables written by independent workers
//! into one distribution summary per asset:
//! - Concatenation with column realignment and schema checks (`aggregate`)
//! - Per-asset summary rows (`summary`)
//! - The fixed-width text report (`report`)
//! - Error types: `AggregateError` (`error`)
//!
//! ## Usage Example
//!
//! ```rust
//! use sim_aggregate::{render_report, Aggregator};
//! use sim_paths::TrialResultTable;
//!
//! let worker_0 = TrialResultTable::from_rows(
//!     vec!["AAPL".to_string()],
//!     vec![vec![98.5], vec![101.0]],
//! )
//! .unwrap();
//! let worker_1 = TrialResultTable::from_rows(
//!     vec!["AAPL".to_string()],
//!     vec![vec![100.0], vec![102.5]],
//! )
//! .unwrap();
//!
//! let summary = Aggregator::with_expected_tables(2)
//!     .aggregate(&[worker_0, worker_1])
//!     .unwrap();
//!
//! assert_eq!(summary.n_trials(), 4);
//! assert_eq!(summary.get("AAPL").unwrap().mean, 100.5);
//! print!("{}", render_report(&summary));
//! ```

#![deny(missing_docs)]

pub mod aggregate;
pub mod error;
pub mod report;
pub mod summary;

pub use aggregate::{aggregate, Aggregator};
pub use error::AggregateError;
pub use report::render_report;
pub use summary::{AggregateTable, AssetSummary};
