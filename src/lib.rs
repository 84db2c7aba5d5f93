//! dataload - Parquet footer, schema-document and CSV conversion toolkit
//!
//! The core is a set of symmetric codecs around a table's metadata envelope:
//!
//! - `schema`: column descriptors, the schema-document language and the bridge
//!   between them
//! - `footer`: the native binary trailer (Thrift compact encoding)
//! - `metadata`: the envelope and its JSON document form
//! - `format`: logical-type-aware text rendering of column values
//! - `export`: row streaming to comma-separated text

pub mod cli;
pub mod errors;
pub mod export;
pub mod footer;
pub mod format;
pub mod metadata;
pub mod observability;
pub mod schema;
