//! Error types for price history validation and return statistics.
//!
//! Every variant is fatal for the invocation that raised it: the simulator
//! has no degraded mode and produces no partial output.

use thiserror::Error;

/// Errors raised while building price tables or deriving return statistics.
///
/// # Examples
/// ```
/// use sim_core::SimError;
///
/// let err = SimError::InsufficientHistory { rows: 1 };
/// assert_eq!(
///     format!("{}", err),
///     "Insufficient history: got 1 row(s), need at least 2 to compute returns"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Fewer than two historical rows, so no return can be computed.
    #[error("Insufficient history: got {rows} row(s), need at least 2 to compute returns")]
    InsufficientHistory {
        /// Number of rows supplied
        rows: usize,
    },

    /// A price table without any asset column.
    #[error("Price table has no asset columns")]
    EmptyAssets,

    /// The same asset name appears twice in the header.
    #[error("Duplicate asset column '{0}'")]
    DuplicateAsset(String),

    /// An asset column with an empty name.
    #[error("Asset column {index} has an empty name")]
    UnnamedAsset {
        /// Zero-based column index
        index: usize,
    },

    /// A row whose width differs from the number of assets.
    #[error("Row {row} has {got} value(s), expected {expected}")]
    RaggedRow {
        /// Zero-based row index
        row: usize,
        /// Number of values in the row
        got: usize,
        /// Number of asset columns
        expected: usize,
    },

    /// A price that is zero, negative, NaN or infinite.
    #[error("Invalid price {value} for asset '{asset}' at row {row}: prices must be finite and strictly positive")]
    InvalidPrice {
        /// Asset column name
        asset: String,
        /// Zero-based row index
        row: usize,
        /// Offending value
        value: f64,
    },

    /// Covariance matrix dimensions do not match the data supplied.
    #[error("Invalid matrix dimensions: expected {expected} elements, got {got}")]
    InvalidDimensions {
        /// Expected element count
        expected: usize,
        /// Actual element count
        got: usize,
    },

    /// Covariance matrix is not symmetric positive semi-definite.
    #[error("Covariance matrix is not positive semi-definite (pivot {pivot} at index {index})")]
    NotPositiveSemiDefinite {
        /// Diagonal index where the factorisation failed
        index: usize,
        /// Negative pivot encountered
        pivot: f64,
    },

    /// A simulated price underflowed to zero or overflowed to infinity.
    #[error("Simulated price {value} for asset '{asset}' in trial {trial} is outside the representable range")]
    NumericalRange {
        /// Asset column name
        asset: String,
        /// Zero-based trial index
        trial: usize,
        /// Offending value
        value: f64,
    },
}

/// Result alias for fallible sim_core operations.
pub type Result<T> = std::result::Result<T, SimError>;
