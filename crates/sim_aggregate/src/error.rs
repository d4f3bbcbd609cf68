//! Aggregation error types.

use thiserror::Error;

/// Errors raised while reducing trial tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// No trial tables were supplied.
    #[error("Nothing to aggregate: no trial tables supplied")]
    EmptyInput,

    /// A table's asset columns differ from the first table's.
    #[error("Schema mismatch in table {table}: expected columns {expected:?}, found {found:?}")]
    SchemaMismatch {
        /// Zero-based index of the offending table
        table: usize,
        /// Columns of the first table
        expected: Vec<String>,
        /// Columns of the offending table
        found: Vec<String>,
    },

    /// Fewer or more tables than the expected worker count.
    #[error("Incomplete input: expected {expected} worker table(s), found {found}")]
    IncompleteInput {
        /// Expected number of tables
        expected: usize,
        /// Number of tables received
        found: usize,
    },

    /// Every table is empty, so there are no trials to summarise.
    #[error("No trials to aggregate: all {tables} table(s) are empty")]
    NoTrials {
        /// Number of tables received
        tables: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert!(AggregateError::EmptyInput
            .to_string()
            .contains("no trial tables"));

        let err = AggregateError::SchemaMismatch {
            table: 2,
            expected: vec!["AAPL".to_string()],
            found: vec!["MSFT".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("table 2"));
        assert!(msg.contains("AAPL"));
        assert!(msg.contains("MSFT"));

        let err = AggregateError::IncompleteInput {
            expected: 10,
            found: 9,
        };
        assert_eq!(
            err.to_string(),
            "Incomplete input: expected 10 worker table(s), found 9"
        );
    }
}
