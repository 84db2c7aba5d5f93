//! Untyped row values
//!
//! A value only gains meaning when paired with its column descriptor at
//! format time.

/// One cell of a row, as produced by a record source
#[derive(Debug, Clone, PartialEq)]
pub enum RowValue {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// Raw bytes; decimals carry their two's-complement unscaled value here
    Bytes(Vec<u8>),
    /// A record, list or map cell, named by its shape
    Nested(&'static str),
}

impl RowValue {
    /// Returns the kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            RowValue::Null => "null",
            RowValue::Boolean(_) => "boolean",
            RowValue::Int(_) => "int32",
            RowValue::Long(_) => "int64",
            RowValue::Float(_) => "float32",
            RowValue::Double(_) => "float64",
            RowValue::String(_) => "string",
            RowValue::Bytes(_) => "bytes",
            RowValue::Nested(shape) => shape,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RowValue::Null)
    }
}

impl From<&str> for RowValue {
    fn from(value: &str) -> Self {
        RowValue::String(value.to_string())
    }
}

impl From<String> for RowValue {
    fn from(value: String) -> Self {
        RowValue::String(value)
    }
}

impl From<i32> for RowValue {
    fn from(value: i32) -> Self {
        RowValue::Int(value)
    }
}

impl From<i64> for RowValue {
    fn from(value: i64) -> Self {
        RowValue::Long(value)
    }
}

impl From<f64> for RowValue {
    fn from(value: f64) -> Self {
        RowValue::Double(value)
    }
}

impl From<bool> for RowValue {
    fn from(value: bool) -> Self {
        RowValue::Boolean(value)
    }
}

impl<T: Into<RowValue>> From<Option<T>> for RowValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValue::Null, Into::into)
    }
}
