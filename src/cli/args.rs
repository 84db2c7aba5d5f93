//! CLI argument definitions using clap
//!
//! Commands:
//! - dataload export <FILE.parquet>...
//! - dataload to-json <FILE.parquet>...
//! - dataload from-json <FILE.json>...
//! - dataload validate <SCHEMA.avsc>...

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dataload - Parquet metadata and row export tool
#[derive(Parser, Debug)]
#[command(name = "dataload")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to an optional JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Offset for rendered dates (Z, +hh, +hhmm, +hh:mm); system local when absent
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub tz_offset: Option<String>,

    /// Reject record, field, enum and symbol names outside [A-Za-z_][A-Za-z0-9_]*
    #[arg(long, global = true)]
    pub strict_names: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Export the rows of Parquet files to sibling .csv files
    Export {
        /// Parquet files to export
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Write the footer metadata of Parquet files to sibling .json files
    ToJson {
        /// Parquet files to describe
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Build footer-only Parquet files from JSON metadata documents
    FromJson {
        /// JSON metadata documents
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Parse schema documents and print their column headers
    Validate {
        /// Schema documents
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

impl Command {
    /// Name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Export { .. } => "export",
            Command::ToJson { .. } => "to-json",
            Command::FromJson { .. } => "from-json",
            Command::Validate { .. } => "validate",
        }
    }

    /// Inputs of the command, in order
    pub fn files(&self) -> &[PathBuf] {
        match self {
            Command::Export { files }
            | Command::ToJson { files }
            | Command::FromJson { files }
            | Command::Validate { files } => files,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_with_negative_offset() {
        let cli = Cli::try_parse_from(["dataload", "export", "--tz-offset", "-08:00", "a.parquet", "b.PARQUET"]).unwrap();
        assert_eq!(cli.tz_offset.as_deref(), Some("-08:00"));
        assert_eq!(cli.command.name(), "export");
        assert_eq!(cli.command.files().len(), 2);
    }

    #[test]
    fn test_files_are_required() {
        assert!(Cli::try_parse_from(["dataload", "to-json"]).is_err());
    }

    #[test]
    fn test_global_flags_before_subcommand() {
        let cli = Cli::try_parse_from(["dataload", "--strict-names", "validate", "s.avsc"]).unwrap();
        assert!(cli.strict_names);
        assert!(cli.config.is_none());
    }
}
