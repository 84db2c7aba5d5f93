//! Column descriptors <-> Parquet schema types
//!
//! Leaves are built with a logical type annotation; the schema builder fills
//! in the matching legacy converted type so older and newer readers agree on
//! the meaning.

use std::sync::Arc;

use parquet::basic::{
    ConvertedType, LogicalType as NativeLogicalType, Repetition, TimeUnit, Type as PhysicalType,
};
use parquet::format::MilliSeconds;
use parquet::schema::types::{Type, TypePtr};

use crate::schema::{
    ColumnDescriptor, ColumnSchema, ColumnType, LogicalType, SchemaError, SchemaResult,
};

/// Builds the root group for a column schema
pub fn to_native(schema: &ColumnSchema) -> SchemaResult<TypePtr> {
    let fields = schema
        .columns()
        .iter()
        .map(column_to_type)
        .collect::<SchemaResult<Vec<_>>>()?;
    let root = Type::group_type_builder(schema.name())
        .with_fields(fields)
        .build()
        .map_err(|e| SchemaError::malformed(format!("invalid native schema: {}", e)))?;
    Ok(Arc::new(root))
}

fn millis() -> TimeUnit {
    TimeUnit::MILLIS(MilliSeconds {})
}

fn column_to_type(column: &ColumnDescriptor) -> SchemaResult<TypePtr> {
    let values: Vec<&ColumnType> = column.value_members().collect();
    if values.len() > 1 {
        return Err(SchemaError::unsupported_shape(
            &column.name,
            "union of several value types",
        ));
    }
    let value_type = values.first().copied().unwrap_or(&ColumnType::Null);
    let repetition = if column.is_nullable() || value_type.is_null() {
        Repetition::OPTIONAL
    } else {
        Repetition::REQUIRED
    };

    let (physical, logical) = match value_type {
        ColumnType::Null => (PhysicalType::INT32, Some(NativeLogicalType::Unknown)),
        ColumnType::Boolean => (PhysicalType::BOOLEAN, None),
        ColumnType::Int32 => (PhysicalType::INT32, None),
        ColumnType::Int64 => (PhysicalType::INT64, None),
        ColumnType::Float32 => (PhysicalType::FLOAT, None),
        ColumnType::Float64 => (PhysicalType::DOUBLE, None),
        ColumnType::String | ColumnType::Logical(LogicalType::Uuid) => {
            (PhysicalType::BYTE_ARRAY, Some(NativeLogicalType::String))
        }
        ColumnType::Enum(_) => (PhysicalType::BYTE_ARRAY, Some(NativeLogicalType::Enum)),
        ColumnType::Logical(LogicalType::Date) => {
            (PhysicalType::INT32, Some(NativeLogicalType::Date))
        }
        ColumnType::Logical(LogicalType::TimeMillis) => (
            PhysicalType::INT32,
            Some(NativeLogicalType::Time {
                is_adjusted_to_u_t_c: true,
                unit: millis(),
            }),
        ),
        ColumnType::Logical(LogicalType::TimestampMillis) => (
            PhysicalType::INT64,
            Some(NativeLogicalType::Timestamp {
                is_adjusted_to_u_t_c: true,
                unit: millis(),
            }),
        ),
        ColumnType::Logical(LogicalType::Decimal { precision, scale }) => (
            PhysicalType::BYTE_ARRAY,
            Some(NativeLogicalType::Decimal {
                scale: *scale as i32,
                precision: *precision as i32,
            }),
        ),
    };

    let mut builder = Type::primitive_type_builder(&column.name, physical)
        .with_repetition(repetition)
        .with_logical_type(logical);
    if let ColumnType::Logical(LogicalType::Decimal { precision, scale }) = value_type {
        builder = builder
            .with_precision(*precision as i32)
            .with_scale(*scale as i32);
    }
    builder
        .build()
        .map(Arc::new)
        .map_err(|e| SchemaError::malformed_field(&column.name, e.to_string()))
}

/// Annotation of a leaf, from the logical type or else the converted type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Annotation {
    None,
    Text,
    Decimal { precision: i32, scale: i32 },
    Date,
    TimeMillis,
    Timestamp,
    Null,
    Other,
}

impl Annotation {
    fn of(
        logical: Option<&NativeLogicalType>,
        converted: ConvertedType,
        precision: i32,
        scale: i32,
    ) -> Self {
        if let Some(logical) = logical {
            return match logical {
                NativeLogicalType::String
                | NativeLogicalType::Enum
                | NativeLogicalType::Json
                | NativeLogicalType::Uuid => Annotation::Text,
                NativeLogicalType::Decimal { scale, precision } => Annotation::Decimal {
                    precision: *precision,
                    scale: *scale,
                },
                NativeLogicalType::Date => Annotation::Date,
                NativeLogicalType::Time {
                    unit: TimeUnit::MILLIS(_),
                    ..
                } => Annotation::TimeMillis,
                NativeLogicalType::Timestamp { .. } => Annotation::Timestamp,
                NativeLogicalType::Integer { .. } => Annotation::None,
                NativeLogicalType::Unknown => Annotation::Null,
                _ => Annotation::Other,
            };
        }
        match converted {
            ConvertedType::NONE
            | ConvertedType::INT_8
            | ConvertedType::INT_16
            | ConvertedType::INT_32
            | ConvertedType::INT_64
            | ConvertedType::UINT_8
            | ConvertedType::UINT_16
            | ConvertedType::UINT_32
            | ConvertedType::UINT_64 => Annotation::None,
            ConvertedType::UTF8 | ConvertedType::ENUM | ConvertedType::JSON => Annotation::Text,
            ConvertedType::DECIMAL => Annotation::Decimal { precision, scale },
            ConvertedType::DATE => Annotation::Date,
            ConvertedType::TIME_MILLIS => Annotation::TimeMillis,
            ConvertedType::TIMESTAMP_MILLIS | ConvertedType::TIMESTAMP_MICROS => {
                Annotation::Timestamp
            }
            _ => Annotation::Other,
        }
    }
}

/// Rebuilds column descriptors from a root group.
///
/// OPTIONAL leaves become `union[null, T]`. Groups, repeated leaves and
/// leaves without a textual, decimal or temporal meaning are rejected.
pub fn from_native(root: &Type) -> SchemaResult<ColumnSchema> {
    if !root.is_group() {
        return Err(SchemaError::malformed(format!(
            "native schema root '{}' is not a group",
            root.name()
        )));
    }
    let columns = root
        .get_fields()
        .iter()
        .map(|field| field_to_column(field))
        .collect::<SchemaResult<Vec<_>>>()?;
    ColumnSchema::new(root.name(), columns)
}

fn field_to_column(field: &Type) -> SchemaResult<ColumnDescriptor> {
    let name = field.name();
    let Type::PrimitiveType {
        basic_info,
        physical_type,
        precision,
        scale,
        ..
    } = field
    else {
        return Err(SchemaError::unsupported_shape(name, "group"));
    };
    if !basic_info.has_repetition() {
        return Err(SchemaError::malformed_field(name, "missing repetition"));
    }
    let repetition = basic_info.repetition();
    if repetition == Repetition::REPEATED {
        return Err(SchemaError::unsupported_shape(name, "repeated"));
    }

    let logical = basic_info.logical_type();
    let annotation = Annotation::of(
        logical.as_ref(),
        basic_info.converted_type(),
        *precision,
        *scale,
    );
    let physical = *physical_type;
    let column_type = match (physical, annotation) {
        (_, Annotation::Decimal { precision, scale }) => decimal(name, physical, precision, scale)?,
        (PhysicalType::BOOLEAN, _) => ColumnType::Boolean,
        (PhysicalType::INT32, Annotation::Date) => ColumnType::Logical(LogicalType::Date),
        (PhysicalType::INT32, Annotation::TimeMillis) => {
            ColumnType::Logical(LogicalType::TimeMillis)
        }
        (PhysicalType::INT32 | PhysicalType::INT64, Annotation::Null) => ColumnType::Null,
        (PhysicalType::INT32, _) => ColumnType::Int32,
        (PhysicalType::INT64, Annotation::Timestamp) => {
            ColumnType::Logical(LogicalType::TimestampMillis)
        }
        (PhysicalType::INT64, _) => ColumnType::Int64,
        (PhysicalType::FLOAT, _) => ColumnType::Float32,
        (PhysicalType::DOUBLE, _) => ColumnType::Float64,
        (PhysicalType::BYTE_ARRAY, Annotation::Text) => ColumnType::String,
        (PhysicalType::BYTE_ARRAY, _) => return Err(SchemaError::unsupported_shape(name, "bytes")),
        (PhysicalType::FIXED_LEN_BYTE_ARRAY, _) => {
            return Err(SchemaError::unsupported_shape(name, "fixed"))
        }
        (PhysicalType::INT96, _) => return Err(SchemaError::unsupported_shape(name, "int96")),
    };

    Ok(match (repetition, &column_type) {
        (_, ColumnType::Null) | (Repetition::REQUIRED, _) => {
            ColumnDescriptor::new(name, column_type)
        }
        _ => ColumnDescriptor::nullable(name, column_type),
    })
}

fn decimal(name: &str, physical: PhysicalType, precision: i32, scale: i32) -> SchemaResult<ColumnType> {
    match physical {
        PhysicalType::INT32
        | PhysicalType::INT64
        | PhysicalType::BYTE_ARRAY
        | PhysicalType::FIXED_LEN_BYTE_ARRAY => {}
        _ => return Err(SchemaError::unsupported_shape(name, "decimal on non-integer storage")),
    }
    if precision <= 0 || scale < 0 || scale > precision {
        return Err(SchemaError::malformed_field(
            name,
            format!("invalid decimal precision {} scale {}", precision, scale),
        ));
    }
    Ok(ColumnType::Logical(LogicalType::Decimal {
        precision: precision as u32,
        scale: scale as u32,
    }))
}
