//! CLI command implementations
//!
//! Every command runs over a batch of inputs. Inputs are processed
//! independently: a failing input is logged with its error code and the
//! batch continues. The command fails after the batch if any input failed.

use std::fs;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::errors::ErrorCode;
use crate::export::{export_to_path, ExportSummary, ParquetSource};
use crate::footer::{read_footer_file, write_footer_file};
use crate::format::{TimeZoneSetting, ValueFormatter};
use crate::metadata::MetadataJsonCodec;
use crate::observability;
use crate::schema::{SchemaLoader, SchemaParser};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{
    read_text, require_extension, sibling_path, write_text, CSV_EXTENSION, JSON_EXTENSION,
    PARQUET_EXTENSION, SCHEMA_EXTENSION,
};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Offset for rendered dates (optional, default system local)
    #[serde(default)]
    pub tz_offset: Option<String>,

    /// Strict schema name validation (optional, default false)
    #[serde(default)]
    pub strict_names: bool,

    /// Log level (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tz_offset: None,
            strict_names: false,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Applies command-line flags on top of the file values
    pub fn with_overrides(mut self, tz_offset: Option<String>, strict_names: bool) -> Self {
        if tz_offset.is_some() {
            self.tz_offset = tz_offset;
        }
        self.strict_names |= strict_names;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        self.settings().map(|_| ())
    }

    /// Resolves the validated runtime settings
    pub fn settings(&self) -> CliResult<Settings> {
        let log_level = match self.log_level.to_ascii_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            other => {
                return Err(CliError::config_error(format!(
                    "Invalid log_level: '{}'. Must be one of error, warn, info, debug, trace.",
                    other
                )))
            }
        };

        let zone = match &self.tz_offset {
            None => TimeZoneSetting::Local,
            Some(text) => TimeZoneSetting::parse(text).map_err(|e| {
                CliError::config_error(format!("{}: {}", ErrorCode::InvalidConfig.code(), e))
            })?,
        };

        Ok(Settings {
            zone,
            parser: SchemaParser::new().with_strict_names(self.strict_names),
            log_level,
        })
    }
}

/// Validated settings shared by every command
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub zone: TimeZoneSetting,
    pub parser: SchemaParser,
    pub log_level: LevelFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            zone: TimeZoneSetting::Local,
            parser: SchemaParser::new(),
            log_level: LevelFilter::Info,
        }
    }
}

/// Parse arguments, load configuration and run the selected command
pub fn run() -> CliResult<()> {
    run_cli(Cli::parse_args())
}

/// Run a parsed command line
pub fn run_cli(cli: Cli) -> CliResult<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let settings = config
        .with_overrides(cli.tz_offset.clone(), cli.strict_names)
        .settings()?;
    observability::init(settings.log_level);
    run_command(&cli.command, &settings)
}

/// Run the appropriate command over all of its inputs
pub fn run_command(cmd: &Command, settings: &Settings) -> CliResult<()> {
    match cmd {
        Command::Export { files } => run_batch(cmd.name(), files, |input| export(input, settings)),
        Command::ToJson { files } => run_batch(cmd.name(), files, |input| to_json(input, settings)),
        Command::FromJson { files } => {
            run_batch(cmd.name(), files, |input| from_json(input, settings))
        }
        Command::Validate { files } => {
            run_batch(cmd.name(), files, |input| validate(input, settings))
        }
    }
}

/// Applies `op` to every input, logging failures instead of stopping.
fn run_batch<T>(
    command: &str,
    inputs: &[PathBuf],
    mut op: impl FnMut(&Path) -> CliResult<T>,
) -> CliResult<()> {
    let mut failed = 0;
    for input in inputs {
        if let Err(e) = op(input) {
            failed += 1;
            log::error!("{} {} failed: {}", command, input.display(), e);
        }
    }

    if failed > 0 {
        return Err(CliError::batch_failed(command, failed, inputs.len()));
    }
    log::info!("{} finished: {} inputs", command, inputs.len());
    Ok(())
}

/// Export the rows of one Parquet file to its sibling `.csv` file
pub fn export(input: &Path, settings: &Settings) -> CliResult<ExportSummary> {
    require_extension(input, &[PARQUET_EXTENSION])?;
    let output = sibling_path(input, CSV_EXTENSION);

    let source = ParquetSource::open(input, &settings.parser)?;
    let summary = export_to_path(source, ValueFormatter::new(settings.zone), &output)?;

    if !summary.removed_empty {
        log::info!(
            "exported {} rows from {} to {}",
            summary.rows,
            input.display(),
            output.display()
        );
    }
    Ok(summary)
}

/// Write the footer metadata of one Parquet file to its sibling `.json` file
///
/// Returns the output path, or `None` when the document was empty and removed.
pub fn to_json(input: &Path, settings: &Settings) -> CliResult<Option<PathBuf>> {
    require_extension(input, &[PARQUET_EXTENSION])?;
    let output = sibling_path(input, JSON_EXTENSION);

    let envelope = read_footer_file(input)?;
    let text = MetadataJsonCodec::new(settings.parser).to_json(&envelope)?;
    if !write_text(&output, &text)? {
        return Ok(None);
    }

    log::info!("wrote metadata of {} to {}", input.display(), output.display());
    Ok(Some(output))
}

/// Build a footer-only Parquet file from one JSON metadata document
///
/// Blank documents are skipped with a warning and return `None`.
pub fn from_json(input: &Path, settings: &Settings) -> CliResult<Option<PathBuf>> {
    require_extension(input, &[JSON_EXTENSION])?;
    let output = sibling_path(input, PARQUET_EXTENSION);

    let text = read_text(input)?;
    if text.trim().is_empty() {
        log::warn!("{} is empty, skipped", input.display());
        return Ok(None);
    }

    let envelope = MetadataJsonCodec::new(settings.parser).from_json(&text)?;
    let written = write_footer_file(&envelope, &output)?;

    log::info!(
        "wrote {} footer bytes from {} to {}",
        written,
        input.display(),
        output.display()
    );
    Ok(Some(output))
}

/// Parse one schema document and report its column headers
///
/// Returns the comma-joined upper-cased field names.
pub fn validate(input: &Path, settings: &Settings) -> CliResult<String> {
    require_extension(input, &[SCHEMA_EXTENSION, JSON_EXTENSION])?;

    let columns = SchemaLoader::new(settings.parser).load_columns(input)?;
    let header = columns.header_names().join(",");

    log::info!("{}: {}", input.display(), header);
    Ok(header)
}
