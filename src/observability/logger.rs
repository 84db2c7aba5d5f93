//! Structured JSON log sink
//!
//! - One log line = one JSON object
//! - Deterministic key ordering: `event`, `severity`, then fields sorted
//! - INFO and below on stdout, WARN and ERROR on stderr
//! - Synchronous, no buffering

use std::io::{self, Write};

use log::{Level, LevelFilter, Log, Metadata, Record};

/// `log` backend writing JSON lines
///
/// Filtering follows [`log::max_level`], so one instance serves every level.
#[derive(Debug, Default)]
pub struct JsonLogger;

static LOGGER: JsonLogger = JsonLogger;

/// Installs [`JsonLogger`] as the global logger and sets the level.
///
/// Safe to call repeatedly; later calls only change the level.
pub fn init(level: LevelFilter) {
    log::set_max_level(level);
    if log::set_logger(&LOGGER).is_ok() {
        log::debug!("json logger installed");
    }
}

impl JsonLogger {
    /// Renders one log line, newline included
    pub fn render(level: Level, event: &str, fields: &[(&str, &str)]) -> String {
        let mut output = String::with_capacity(128);

        output.push_str("{\"event\":\"");
        escape_json_string(&mut output, event);
        output.push_str("\",\"severity\":\"");
        output.push_str(level.as_str());
        output.push('"');

        let mut sorted_fields: Vec<_> = fields.iter().collect();
        sorted_fields.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted_fields {
            output.push_str(",\"");
            escape_json_string(&mut output, key);
            output.push_str("\":\"");
            escape_json_string(&mut output, value);
            output.push('"');
        }

        output.push_str("}\n");
        output
    }
}

impl Log for JsonLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = Self::render(
            record.level(),
            &record.args().to_string(),
            &[("target", record.target())],
        );
        // one write per line; a failed log write is dropped
        if record.level() <= Level::Warn {
            let _ = io::stderr().lock().write_all(line.as_bytes());
        } else {
            let _ = io::stdout().lock().write_all(line.as_bytes());
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
    }
}

fn escape_json_string(output: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => {
                output.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => output.push(c),
        }
    }
}
