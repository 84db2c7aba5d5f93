//! CLI module
//!
//! Provides the command-line interface for:
//! - export: Parquet rows to comma-separated text
//! - to-json: Parquet footer metadata to a JSON document
//! - from-json: JSON document to a footer-only Parquet file
//! - validate: Schema document check

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    export, from_json, run, run_cli, run_command, to_json, validate, Config, Settings,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{has_extension, sibling_path};
