//! Custom error types for cashflow
//!
//! Every failure the engine can report is a variant of [`CashflowError`].
//! All of them are terminal for the request that triggered them: the input
//! data is static, so there is nothing to retry against.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for cashflow operations
#[derive(Error, Debug)]
pub enum CashflowError {
    /// Malformed rule configuration or settings file
    #[error("Configuration error: {0}")]
    Config(String),

    /// A record handed over by a statement parser is missing a required field
    /// or carries a value of the wrong type
    #[error("Malformed record at row {row}: field '{field}' {reason}")]
    MalformedRecord {
        row: usize,
        field: &'static str,
        reason: String,
    },

    /// The aggregation window contains no records
    #[error("No transactions between {start} and {stop} (both dates excluded)")]
    EmptyPeriod { start: NaiveDate, stop: NaiveDate },

    /// The records in the window span zero days, so a monthly rate is undefined
    #[error(
        "Transactions between {start} and {stop} span zero days; cannot compute monthly averages"
    )]
    DegeneratePeriod { start: NaiveDate, stop: NaiveDate },

    /// A keyword rule is bound to a field the transaction record does not have
    #[error("Rule for category '{category}' references unknown field '{field}'")]
    UnknownRuleField { category: String, field: String },

    /// The bank export format is not supported
    #[error("Unsupported statement format: {0}")]
    UnsupportedFormat(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Validation errors for user supplied arguments
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CashflowError {
    /// Create a "malformed record" error
    pub fn malformed(row: usize, field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            row,
            field,
            reason: reason.into(),
        }
    }

    /// Check if this is a configuration error (bad rules or settings)
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::UnknownRuleField { .. })
    }

    /// Check if this error comes from an empty aggregation window
    pub fn is_empty_period(&self) -> bool {
        matches!(self, Self::EmptyPeriod { .. })
    }

    /// Check if this error comes from a zero-length period under normalization
    pub fn is_degenerate_period(&self) -> bool {
        matches!(self, Self::DegeneratePeriod { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for CashflowError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CashflowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for CashflowError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

impl From<csv::Error> for CashflowError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for cashflow operations
pub type CashflowResult<T> = Result<T, CashflowError>;
