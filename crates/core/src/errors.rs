//! Core error types for the schedule engine.
//!
//! Every failure is reported before the period loop starts, except
//! `ComputationInconsistency`, which signals that a finished schedule broke
//! one of its own invariants.

use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    #[error("Repayment method '{0}' is not supported")]
    UnsupportedMethod(String),

    #[error("Schedule failed its consistency check: {0}")]
    ComputationInconsistency(String),

    #[error("Invalid configuration value: {0}")]
    Config(String),

    #[error("Rate index error: {0}")]
    RateIndex(String),

    #[error("Schedule sink failed: {0}")]
    Sink(String),
}

/// Validation errors for caller-supplied parameters.
///
/// Messages name the offending field so callers can surface them directly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be a positive integer")]
    NotPositiveInteger { field: &'static str },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("rate adjustment period {period} is outside 1..={total_periods}")]
    AdjustmentOutOfRange { period: u32, total_periods: u32 },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Sink(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Sink(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
