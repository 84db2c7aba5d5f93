//! Export subsystem
//!
//! Streams the rows of a record source into comma-separated text. Sources
//! are either in memory or Parquet files; formatting is delegated to
//! [`crate::format::ValueFormatter`].

mod errors;
mod parquet_source;
mod source;
mod streamer;

pub use errors::{ExportError, ExportResult};
pub use parquet_source::ParquetSource;
pub use source::{RecordSource, VecSource};
pub use streamer::{export_to_path, write_lines, ExportSummary, RowStream};
