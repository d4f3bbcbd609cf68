//! Storage and codec error types.

use std::fmt;

use sim_core::SimError;
use thiserror::Error;

/// Storage operation that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransferOp {
    /// Object download
    Get,
    /// Object upload
    Put,
    /// Prefix listing
    List,
}

impl fmt::Display for TransferOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferOp::Get => "get",
            TransferOp::Put => "put",
            TransferOp::List => "list",
        };
        f.write_str(name)
    }
}

/// A failed download, upload or listing.
///
/// Transfers are never retried; the error is fatal for the invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Storage {op} failed for {bucket}/{key}: {reason}")]
pub struct TransferError {
    /// Operation that failed
    pub op: TransferOp,
    /// Bucket addressed
    pub bucket: String,
    /// Object key or listing prefix
    pub key: String,
    /// Human-readable cause
    pub reason: String,
}

impl TransferError {
    /// Creates a transfer error.
    pub fn new(
        op: TransferOp,
        bucket: impl Into<String>,
        key: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self {
            op,
            bucket: bucket.into(),
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a "no such object" error for a download.
    pub fn not_found(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(TransferOp::Get, bucket, key, "object not found")
    }
}

/// Errors raised while decoding or encoding CSV tables.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The underlying CSV reader or writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The document has no header row.
    #[error("CSV document has no header row")]
    MissingHeader,

    /// The header has a label column but no data columns.
    #[error("CSV header has no data columns")]
    NoDataColumns,

    /// A cell that is not a number.
    #[error("Cannot parse '{value}' at row {row}, column '{column}' as a number")]
    InvalidNumber {
        /// Zero-based data row index
        row: usize,
        /// Column name
        column: String,
        /// Raw cell content
        value: String,
    },

    /// A row with a different number of cells than the header.
    #[error("Row {row} has {got} cell(s), expected {expected}")]
    RaggedRow {
        /// Zero-based data row index
        row: usize,
        /// Cells in the row
        got: usize,
        /// Cells in the header
        expected: usize,
    },

    /// The decoded table violates a domain invariant.
    #[error(transparent)]
    Table(#[from] SimError),

    /// Encoded output is not valid UTF-8 or could not be flushed.
    #[error("CSV output error: {0}")]
    Output(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_error_display() {
        let err = TransferError::not_found("results", "job/input/asset_prices.csv");
        assert_eq!(
            err.to_string(),
            "Storage get failed for results/job/input/asset_prices.csv: object not found"
        );
        assert_eq!(err.op, TransferOp::Get);
    }

    #[test]
    fn test_codec_error_display() {
        let err = CodecError::InvalidNumber {
            row: 3,
            column: "AAPL".to_string(),
            value: "n/a".to_string(),
        };
        assert!(err.to_string().contains("row 3"));
        assert!(err.to_string().contains("'AAPL'"));

        let err: CodecError = SimError::EmptyAssets.into();
        assert_eq!(err.to_string(), "Price table has no asset columns");
    }
}
