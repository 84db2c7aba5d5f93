//! Schema subsystem
//!
//! Two representations of a table's columns live here:
//!
//! - the schema document, a JSON record declaration embedded in file metadata
//! - column descriptors, the flat typed view every codec and the formatter use
//!
//! The bridge converts between them and rejects anything that is not a flat
//! record of primitive, enum, logical or union-of-those fields.

mod bridge;
mod document;
mod errors;
mod loader;
mod types;

pub use bridge::{from_column_descriptors, to_column_descriptors};
pub use document::{FieldNode, PrimitiveType, SchemaDocument, SchemaNode, SchemaParser};
pub use errors::{SchemaError, SchemaResult};
pub use loader::SchemaLoader;
pub use types::{
    BackingKind, ColumnDescriptor, ColumnSchema, ColumnShape, ColumnType, EffectiveType,
    EnumType, LogicalType, PrimitiveKind,
};
