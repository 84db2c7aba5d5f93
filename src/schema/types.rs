//! Column type model
//!
//! A column is a named field whose type is either a single branch or a union
//! of branches. Each branch is a primitive kind, an enum, or a logical type
//! layered over a fixed backing encoding:
//!
//! - `Date`, `TimeMillis`, `TimestampMillis`: 64-bit epoch milliseconds
//! - `Decimal{precision, scale}`: two's-complement big-endian unscaled bytes
//! - `Uuid`: 36-character text

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};

/// Primitive kinds a flat column can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Enum,
    Int32,
    Int64,
    Float32,
    Float64,
    Boolean,
    /// Column that only ever holds null
    Null,
}

impl PrimitiveKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Enum => "enum",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Float32 => "float32",
            PrimitiveKind::Float64 => "float64",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Null => "null",
        }
    }
}

/// Backing encoding of a logical type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackingKind {
    Int64,
    Bytes,
    String,
}

impl BackingKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            BackingKind::Int64 => "int64",
            BackingKind::Bytes => "bytes",
            BackingKind::String => "string",
        }
    }
}

/// Semantic interpretation layered over a backing encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    Date,
    TimeMillis,
    TimestampMillis,
    Decimal { precision: u32, scale: u32 },
    Uuid,
}

impl LogicalType {
    /// Returns the logical type name used by schema documents
    pub fn name(&self) -> &'static str {
        match self {
            LogicalType::Date => "date",
            LogicalType::TimeMillis => "time-millis",
            LogicalType::TimestampMillis => "timestamp-millis",
            LogicalType::Decimal { .. } => "decimal",
            LogicalType::Uuid => "uuid",
        }
    }

    /// Returns the fixed backing encoding
    pub fn backing(&self) -> BackingKind {
        match self {
            LogicalType::Date | LogicalType::TimeMillis | LogicalType::TimestampMillis => {
                BackingKind::Int64
            }
            LogicalType::Decimal { .. } => BackingKind::Bytes,
            LogicalType::Uuid => BackingKind::String,
        }
    }

    /// Returns whether values are epoch milliseconds
    pub fn is_temporal(&self) -> bool {
        self.backing() == BackingKind::Int64
    }
}

/// Enumeration declared by a schema document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub namespace: Option<String>,
    pub doc: Option<String>,
    pub symbols: Vec<String>,
}

impl EnumType {
    /// Create an enum without namespace or doc
    pub fn new(name: impl Into<String>, symbols: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            doc: None,
            symbols,
        }
    }

    /// Returns `namespace.name`, or just the name when there is no namespace
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{}.{}", ns, self.name),
            _ => self.name.clone(),
        }
    }
}

/// One branch of a column type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Null,
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Enum(EnumType),
    Logical(LogicalType),
}

impl ColumnType {
    /// Returns the primitive kind, `None` for logical types
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            ColumnType::Null => Some(PrimitiveKind::Null),
            ColumnType::Boolean => Some(PrimitiveKind::Boolean),
            ColumnType::Int32 => Some(PrimitiveKind::Int32),
            ColumnType::Int64 => Some(PrimitiveKind::Int64),
            ColumnType::Float32 => Some(PrimitiveKind::Float32),
            ColumnType::Float64 => Some(PrimitiveKind::Float64),
            ColumnType::String => Some(PrimitiveKind::String),
            ColumnType::Enum(_) => Some(PrimitiveKind::Enum),
            ColumnType::Logical(_) => None,
        }
    }

    /// Returns the logical type, if this branch has one
    pub fn logical_type(&self) -> Option<LogicalType> {
        match self {
            ColumnType::Logical(logical) => Some(*logical),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ColumnType::Null)
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::Logical(logical) => logical.name(),
            other => other
                .primitive_kind()
                .map(|kind| kind.type_name())
                .unwrap_or("unknown"),
        }
    }
}

/// Single type or union of branches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnShape {
    Single(ColumnType),
    Union(Vec<ColumnType>),
}

/// The type a column's values are interpreted as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveType {
    Logical(LogicalType),
    Primitive(PrimitiveKind),
}

/// Named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    /// Field name, verbatim
    pub name: String,
    /// Declared type
    pub shape: ColumnShape,
    /// Optional documentation
    pub doc: Option<String>,
    /// Optional default value, kept as written
    pub default: Option<Value>,
}

impl ColumnDescriptor {
    /// Create a column with a single, non-union type
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            shape: ColumnShape::Single(column_type),
            doc: None,
            default: None,
        }
    }

    /// Create a `union[null, T]` column
    pub fn nullable(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self::union(name, vec![ColumnType::Null, column_type])
    }

    /// Create a union column with the given branches, in declaration order
    pub fn union(name: impl Into<String>, members: Vec<ColumnType>) -> Self {
        Self {
            name: name.into(),
            shape: ColumnShape::Union(members),
            doc: None,
            default: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Returns the declared branches (one for a non-union column)
    pub fn members(&self) -> &[ColumnType] {
        match &self.shape {
            ColumnShape::Single(column_type) => std::slice::from_ref(column_type),
            ColumnShape::Union(members) => members,
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(self.shape, ColumnShape::Union(_))
    }

    /// Returns whether the column can hold null
    pub fn is_nullable(&self) -> bool {
        self.members().iter().any(ColumnType::is_null)
    }

    /// Returns the effective type.
    ///
    /// The first logical type among the branches wins. Without one, the first
    /// non-null branch's kind is used, and a column of only null branches is
    /// `Null`.
    pub fn effective_type(&self) -> EffectiveType {
        let members = self.members();
        if let Some(logical) = members.iter().find_map(ColumnType::logical_type) {
            return EffectiveType::Logical(logical);
        }
        members
            .iter()
            .filter(|member| !member.is_null())
            .find_map(ColumnType::primitive_kind)
            .map(EffectiveType::Primitive)
            .unwrap_or(EffectiveType::Primitive(PrimitiveKind::Null))
    }

    /// Returns the effective logical type, if any
    pub fn effective_logical_type(&self) -> Option<LogicalType> {
        match self.effective_type() {
            EffectiveType::Logical(logical) => Some(logical),
            EffectiveType::Primitive(_) => None,
        }
    }

    /// Returns the non-null branches
    pub fn value_members(&self) -> impl Iterator<Item = &ColumnType> {
        self.members().iter().filter(|member| !member.is_null())
    }

    /// Returns the name as shown in text headers
    pub fn header_name(&self) -> String {
        self.name.to_uppercase()
    }
}

/// Ordered, name-unique set of columns plus the record identity
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    name: String,
    namespace: Option<String>,
    doc: Option<String>,
    columns: Vec<ColumnDescriptor>,
}

impl ColumnSchema {
    /// Create a schema, rejecting duplicate column names
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDescriptor>) -> SchemaResult<Self> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|earlier| earlier.name == column.name) {
                return Err(SchemaError::duplicate_field(&column.name));
            }
        }
        Ok(Self {
            name: name.into(),
            namespace: None,
            doc: None,
            columns,
        })
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn with_doc(mut self, doc: Option<String>) -> Self {
        self.doc = doc;
        self
    }

    /// Record name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Columns in declaration order
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Looks up a column by exact name
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Returns the upper-cased column names
    pub fn header_names(&self) -> Vec<String> {
        self.columns.iter().map(ColumnDescriptor::header_name).collect()
    }
}
