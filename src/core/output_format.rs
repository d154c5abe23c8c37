//! Rendering of finished records into bytes
//!
//! Two formats are provided:
//! - Json: one object per line, for the log files
//! - Text: human-readable single line, optionally with ANSI colors, for the console

use super::error::Result;
use super::fields::FieldValue;
use super::log_level::Level;
use super::record::Record;
use super::timestamp::TimestampFormat;
use std::fmt::Write as _;
use std::time::Instant;

const MESSAGE_KEY: &str = "msg";
const LEVEL_KEY: &str = "level";
const TIME_KEY: &str = "time";

/// Width the message is padded to when fields follow it in text output
const MESSAGE_WIDTH: usize = 44;

/// Output format for log records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    /// `{"level":"info","msg":"Server started","port":8080,"time":"..."}`
    Json { timestamp: TimestampFormat },

    /// `INFO[0003] Server started                               port=8080`
    Text { colors: bool },
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Json {
            timestamp: TimestampFormat::default(),
        }
    }
}

/// Formats records according to an [`OutputFormat`].
///
/// Text output shows seconds elapsed since the formatter was created.
#[derive(Debug, Clone)]
pub struct Formatter {
    format: OutputFormat,
    started: Instant,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            started: Instant::now(),
        }
    }

    pub fn json() -> Self {
        Self::new(OutputFormat::default())
    }

    pub fn text(colors: bool) -> Self {
        Self::new(OutputFormat::Text { colors })
    }

    /// Render a record as a newline-terminated line
    pub fn format(&self, record: &Record) -> Result<Vec<u8>> {
        match &self.format {
            OutputFormat::Json { timestamp } => self.format_json(record, timestamp),
            OutputFormat::Text { colors } => Ok(self.format_text(record, *colors).into_bytes()),
        }
    }

    fn format_json(&self, record: &Record, timestamp: &TimestampFormat) -> Result<Vec<u8>> {
        let mut json_obj = serde_json::Map::new();

        // Custom fields must not clobber the core keys
        for (key, value) in &record.fields {
            let key = match key.as_str() {
                MESSAGE_KEY | LEVEL_KEY | TIME_KEY => format!("fields.{}", key),
                _ => key.clone(),
            };
            json_obj.insert(key, value.to_json_value());
        }

        json_obj.insert(
            TIME_KEY.to_string(),
            timestamp.to_json_value(&record.time),
        );
        json_obj.insert(
            MESSAGE_KEY.to_string(),
            serde_json::Value::String(record.message.clone()),
        );
        json_obj.insert(
            LEVEL_KEY.to_string(),
            serde_json::Value::String(record.level.to_string()),
        );

        let mut bytes = serde_json::to_vec(&serde_json::Value::Object(json_obj))?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn format_text(&self, record: &Record, colors: bool) -> String {
        let level_text: String = record.level.to_str().to_uppercase().chars().take(4).collect();
        let elapsed = self.started.elapsed().as_secs();
        let message = record.message.trim_end_matches('\n');

        let mut out = String::new();
        out.push_str(&paint(&level_text, record.level, colors));
        let _ = write!(out, "[{:04}] ", elapsed);

        if record.fields.is_empty() {
            out.push_str(message);
        } else {
            let _ = write!(out, "{:<width$} ", message, width = MESSAGE_WIDTH);
            for (key, value) in &record.fields {
                let _ = write!(out, " {}={}", paint(key, record.level, colors), text_value(value));
            }
        }

        out.push('\n');
        out
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::json()
    }
}

fn paint(text: &str, level: Level, colors: bool) -> String {
    if colors {
        format!("\x1b[{}m{}\x1b[0m", level.color_code().to_fg_str(), text)
    } else {
        text.to_string()
    }
}

fn text_value(value: &FieldValue) -> String {
    let text = value.to_string();
    if needs_quoting(&text) {
        format!("{:?}", text)
    } else {
        text
    }
}

fn needs_quoting(text: &str) -> bool {
    !text
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+'))
}
