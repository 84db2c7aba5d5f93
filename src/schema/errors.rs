//! Schema error types
//!
//! Error codes:
//! - DL_UNSUPPORTED_SCHEMA_SHAPE (FATAL)
//! - DL_MALFORMED_SCHEMA (FATAL)

use std::fmt;

use crate::errors::{ErrorCode, Severity};

/// Schema error type with full context
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    /// Error code
    code: ErrorCode,
    /// Human-readable message
    message: String,
    /// Field the error refers to, if any
    field: Option<String>,
}

impl SchemaError {
    /// Create an unsupported shape error for a field the bridge cannot flatten
    pub fn unsupported_shape(field: impl Into<String>, shape: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: ErrorCode::UnsupportedSchemaShape,
            message: format!("field '{}' has unsupported shape '{}'", field, shape.into()),
            field: Some(field),
        }
    }

    /// Create a malformed schema error not tied to a field
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::MalformedSchema,
            message: reason.into(),
            field: None,
        }
    }

    /// Create a malformed schema error for a specific field
    pub fn malformed_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: ErrorCode::MalformedSchema,
            message: format!("field '{}': {}", field, reason.into()),
            field: Some(field),
        }
    }

    /// Create a duplicate field error
    pub fn duplicate_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: ErrorCode::MalformedSchema,
            message: format!("field '{}' is declared more than once", field),
            field: Some(field),
        }
    }

    /// Create an invalid name error (strict name validation only)
    pub fn invalid_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: ErrorCode::MalformedSchema,
            message: format!("illegal name '{}'", name),
            field: Some(name),
        }
    }

    /// Create an error for an unreadable schema file
    pub fn unreadable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::MalformedSchema,
            message: format!("Malformed schema file '{}': {}", path.into(), reason.into()),
            field: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field name if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns whether the schema was rejected for its shape
    pub fn is_unsupported_shape(&self) -> bool {
        self.code == ErrorCode::UnsupportedSchemaShape
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
