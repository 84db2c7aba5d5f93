//! Native binary footer codec
//!
//! The trailer of a columnar file: `MAGIC | metadata | length | MAGIC`, where
//! the metadata is the Parquet `FileMetaData` structure. The writer produces
//! footer-only files any standard reader accepts; the reader decodes the
//! trailer of real data files.

mod mapping;
mod reader;
mod writer;

pub use mapping::{from_native, to_native};
pub use reader::{read_footer, read_footer_file, to_envelope};
pub use writer::{serialize_footer, to_parquet_metadata, write_footer_file, MAGIC};
