//! Error taxonomy shared by every subsystem
//!
//! Codes:
//! - DL_UNSUPPORTED_SCHEMA_SHAPE (FATAL)
//! - DL_MALFORMED_SCHEMA (FATAL)
//! - DL_METADATA_PARSE_ERROR (FATAL)
//! - DL_VALUE_ENCODING_MISMATCH (FATAL)
//! - DL_UNSUPPORTED_FIELD_SHAPE (FATAL)
//! - DL_UUID_PARSE_FAILURE (RECOVERABLE)
//! - DL_EMPTY_OUTPUT_PRODUCED (RECOVERABLE)
//! - DL_IO_ERROR (FATAL)
//! - DL_INVALID_CONFIG (FATAL)
//!
//! Fatal errors abort the current input only; recoverable ones are handled
//! where they occur and logged.

use std::fmt;

/// Severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Handled locally, a warning is logged
    Recoverable,
    /// Processing of the current input stops
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Recoverable => write!(f, "RECOVERABLE"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Schema contains a field shape that cannot become a flat column
    UnsupportedSchemaShape,
    /// Schema document is structurally invalid
    MalformedSchema,
    /// Malformed JSON document or binary footer
    MetadataParseError,
    /// A value's runtime type disagrees with its column descriptor
    ValueEncodingMismatch,
    /// A nested value reached the formatter
    UnsupportedFieldShape,
    /// A UUID column held text that is not a UUID
    UuidParseFailure,
    /// An output artifact ended up empty and was deleted
    EmptyOutputProduced,
    /// File-system failure
    IoError,
    /// Unusable configuration value or option
    InvalidConfig,
}

impl ErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::UnsupportedSchemaShape => "DL_UNSUPPORTED_SCHEMA_SHAPE",
            ErrorCode::MalformedSchema => "DL_MALFORMED_SCHEMA",
            ErrorCode::MetadataParseError => "DL_METADATA_PARSE_ERROR",
            ErrorCode::ValueEncodingMismatch => "DL_VALUE_ENCODING_MISMATCH",
            ErrorCode::UnsupportedFieldShape => "DL_UNSUPPORTED_FIELD_SHAPE",
            ErrorCode::UuidParseFailure => "DL_UUID_PARSE_FAILURE",
            ErrorCode::EmptyOutputProduced => "DL_EMPTY_OUTPUT_PRODUCED",
            ErrorCode::IoError => "DL_IO_ERROR",
            ErrorCode::InvalidConfig => "DL_INVALID_CONFIG",
        }
    }

    /// Returns the severity level for this code
    pub fn severity(&self) -> Severity {
        match self {
            ErrorCode::UuidParseFailure | ErrorCode::EmptyOutputProduced => Severity::Recoverable,
            _ => Severity::Fatal,
        }
    }

    /// Returns whether processing may continue after this condition
    pub fn is_recoverable(&self) -> bool {
        self.severity() == Severity::Recoverable
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
