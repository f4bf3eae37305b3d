//! Per-record data errors

use thiserror::Error;

/// A malformed record. Isolated to that record, never aborts an aggregation pass.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("expiration date is missing")]
    MissingExpirationDate,

    #[error("expiration date is not a valid date: {0}")]
    InvalidExpirationDate(String),
}
