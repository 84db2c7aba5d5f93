//! Metadata error types
//!
//! Error codes:
//! - DL_METADATA_PARSE_ERROR (FATAL), always naming the field path
//! - DL_UNSUPPORTED_SCHEMA_SHAPE (FATAL), when writing a footer
//! - DL_IO_ERROR (FATAL)

use std::fmt;
use std::io;

use parquet::errors::ParquetError;

use crate::errors::{ErrorCode, Severity};
use crate::schema::SchemaError;

/// Field path used for errors in the binary trailer framing
pub const FOOTER_FIELD: &str = "footer";

/// Metadata error with the field path it refers to
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataError {
    code: ErrorCode,
    field: String,
    message: String,
}

impl MetadataError {
    /// Create a parse error for `field`
    pub fn parse(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::MetadataParseError,
            field: field.into(),
            message: reason.into(),
        }
    }

    /// Create a parse error for a schema the bridge rejected while decoding
    pub fn schema_rejected(field: impl Into<String>, err: &SchemaError) -> Self {
        let reason = match err.field() {
            Some(inner) => format!("{} (field '{}')", err.message(), inner),
            None => err.message().to_string(),
        };
        Self::parse(field, reason)
    }

    /// Create a parse error for the binary trailer framing
    pub fn footer(reason: impl Into<String>) -> Self {
        Self::parse(FOOTER_FIELD, reason)
    }

    /// Create an I/O error for `path`
    pub fn io(path: impl Into<String>, err: &io::Error) -> Self {
        Self {
            code: ErrorCode::IoError,
            field: path.into(),
            message: err.to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the field path (or file path for I/O errors)
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}: {}",
            self.code.severity(),
            self.code.code(),
            self.field,
            self.message
        )
    }
}

impl std::error::Error for MetadataError {}

/// Schema errors raised while encoding keep their code
impl From<SchemaError> for MetadataError {
    fn from(err: SchemaError) -> Self {
        Self {
            code: err.code(),
            field: err.field().map_or_else(|| "schema".to_string(), |f| format!("schema.{}", f)),
            message: err.message().to_string(),
        }
    }
}

/// Decoding and encoding failures of the trailer are framing errors
impl From<ParquetError> for MetadataError {
    fn from(err: ParquetError) -> Self {
        Self::footer(err.to_string())
    }
}

/// Result type for metadata operations
pub type MetadataResult<T> = Result<T, MetadataError>;
