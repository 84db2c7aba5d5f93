//! # Formatting Errors

use thiserror::Error;

use crate::errors::ErrorCode;

/// Result type for formatting operations
pub type FormatResult<T> = Result<T, FormatError>;

/// Value formatting errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("Column '{column}': expected {expected} value, found {found}")]
    ValueEncodingMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Column '{column}': epoch millisecond value {millis} is out of range")]
    TimestampOutOfRange { column: String, millis: i64 },

    #[error("Column '{column}': {shape} values cannot be formatted")]
    UnsupportedFieldShape { column: String, shape: String },

    #[error("Invalid time zone offset: {0}")]
    InvalidTimeZone(String),
}

impl FormatError {
    /// Returns the crate-wide error code
    pub fn code(&self) -> ErrorCode {
        match self {
            FormatError::ValueEncodingMismatch { .. } | FormatError::TimestampOutOfRange { .. } => {
                ErrorCode::ValueEncodingMismatch
            }
            FormatError::UnsupportedFieldShape { .. } => ErrorCode::UnsupportedFieldShape,
            FormatError::InvalidTimeZone(_) => ErrorCode::InvalidConfig,
        }
    }
}

/// Recoverable condition noticed while formatting a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatWarning {
    pub column: String,
    pub code: ErrorCode,
    pub message: String,
}
