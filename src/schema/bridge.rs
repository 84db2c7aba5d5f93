//! Conversion between schema documents and column descriptors
//!
//! Only flat records are accepted. Fields typed `record`, `array`, `map`,
//! `fixed` or raw `bytes` (including as a union branch) are rejected with
//! `DL_UNSUPPORTED_SCHEMA_SHAPE` naming the field.

use super::document::{FieldNode, PrimitiveType, SchemaDocument, SchemaNode};
use super::errors::{SchemaError, SchemaResult};
use super::types::{ColumnDescriptor, ColumnSchema, ColumnShape, ColumnType};

/// Converts a schema document into ordered column descriptors
pub fn to_column_descriptors(document: &SchemaDocument) -> SchemaResult<ColumnSchema> {
    let columns = document
        .fields
        .iter()
        .map(field_to_column)
        .collect::<SchemaResult<Vec<_>>>()?;

    Ok(ColumnSchema::new(document.name.clone(), columns)?
        .with_namespace(document.namespace.clone())
        .with_doc(document.doc.clone()))
}

/// Converts column descriptors back into a schema document
pub fn from_column_descriptors(schema: &ColumnSchema) -> SchemaDocument {
    SchemaDocument {
        name: schema.name().to_string(),
        namespace: schema.namespace().map(str::to_string),
        doc: schema.doc().map(str::to_string),
        fields: schema.columns().iter().map(column_to_field).collect(),
    }
}

fn field_to_column(field: &FieldNode) -> SchemaResult<ColumnDescriptor> {
    let shape = match &field.schema {
        SchemaNode::Union(members) => ColumnShape::Union(
            members
                .iter()
                .map(|member| branch_to_column_type(&field.name, member))
                .collect::<SchemaResult<Vec<_>>>()?,
        ),
        single => ColumnShape::Single(branch_to_column_type(&field.name, single)?),
    };

    Ok(ColumnDescriptor {
        name: field.name.clone(),
        shape,
        doc: field.doc.clone(),
        default: field.default.clone(),
    })
}

fn branch_to_column_type(field: &str, node: &SchemaNode) -> SchemaResult<ColumnType> {
    match node {
        SchemaNode::Primitive(primitive) => match primitive {
            PrimitiveType::Null => Ok(ColumnType::Null),
            PrimitiveType::Boolean => Ok(ColumnType::Boolean),
            PrimitiveType::Int => Ok(ColumnType::Int32),
            PrimitiveType::Long => Ok(ColumnType::Int64),
            PrimitiveType::Float => Ok(ColumnType::Float32),
            PrimitiveType::Double => Ok(ColumnType::Float64),
            PrimitiveType::String => Ok(ColumnType::String),
            PrimitiveType::Bytes => Err(SchemaError::unsupported_shape(field, "bytes")),
        },
        SchemaNode::Logical(logical) => Ok(ColumnType::Logical(*logical)),
        SchemaNode::Enum(enum_type) => Ok(ColumnType::Enum(enum_type.clone())),
        other => Err(SchemaError::unsupported_shape(field, other.shape_name())),
    }
}

fn column_to_field(column: &ColumnDescriptor) -> FieldNode {
    let schema = match &column.shape {
        ColumnShape::Single(column_type) => column_type_to_node(column_type),
        ColumnShape::Union(members) => {
            SchemaNode::Union(members.iter().map(column_type_to_node).collect())
        }
    };
    FieldNode {
        name: column.name.clone(),
        schema,
        doc: column.doc.clone(),
        default: column.default.clone(),
    }
}

fn column_type_to_node(column_type: &ColumnType) -> SchemaNode {
    match column_type {
        ColumnType::Null => SchemaNode::Primitive(PrimitiveType::Null),
        ColumnType::Boolean => SchemaNode::Primitive(PrimitiveType::Boolean),
        ColumnType::Int32 => SchemaNode::Primitive(PrimitiveType::Int),
        ColumnType::Int64 => SchemaNode::Primitive(PrimitiveType::Long),
        ColumnType::Float32 => SchemaNode::Primitive(PrimitiveType::Float),
        ColumnType::Float64 => SchemaNode::Primitive(PrimitiveType::Double),
        ColumnType::String => SchemaNode::Primitive(PrimitiveType::String),
        ColumnType::Enum(enum_type) => SchemaNode::Enum(enum_type.clone()),
        ColumnType::Logical(logical) => SchemaNode::Logical(*logical),
    }
}
