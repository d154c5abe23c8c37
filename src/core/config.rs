//! Logger configuration

use super::error::{LoggerError, Result};
use super::log_level::Level;
use super::timestamp::TimestampFormat;
use crate::appenders::RotationPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_RETENTION_MINUTES: u64 = 7 * 24 * 60;
const DEFAULT_ROTATION_MINUTES: u64 = 24 * 60;
/// Longest rotation window whose length in seconds fits an `i64` timestamp
const MAX_ROTATION_MINUTES: u64 = i64::MAX as u64 / 60;

fn default_retention_minutes() -> u64 {
    DEFAULT_RETENTION_MINUTES
}

fn default_rotation_minutes() -> u64 {
    DEFAULT_ROTATION_MINUTES
}

/// Everything needed to bring up the file and console sinks
///
/// # Example
///
/// ```
/// use duosink::{Level, LoggerConfig};
///
/// let config = LoggerConfig::new("/var/log/myapp", "myapp")
///     .retention_minutes(60 * 24)
///     .rotation_minutes(60)
///     .file_level(Level::Debug)
///     .stdout_level(Level::Warn);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Directory holding the log files; created if missing
    pub directory: PathBuf,
    /// Name used for `<prefix>.log` and `<timestamp>-<prefix>.json`
    pub file_prefix: String,
    /// Rotated files older than this are deleted; zero keeps them forever
    #[serde(default = "default_retention_minutes")]
    pub retention_minutes: u64,
    /// Length of one rotation window
    #[serde(default = "default_rotation_minutes")]
    pub rotation_minutes: u64,
    #[serde(default)]
    pub file_level: Level,
    #[serde(default)]
    pub stdout_level: Level,
    /// Gzip files once their rotation window has passed
    #[serde(default)]
    pub compress_rotated: bool,
    /// How the `time` key of file records is written
    #[serde(default)]
    pub timestamp_format: TimestampFormat,
}

impl LoggerConfig {
    pub fn new(directory: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            file_prefix: file_prefix.into(),
            retention_minutes: DEFAULT_RETENTION_MINUTES,
            rotation_minutes: DEFAULT_ROTATION_MINUTES,
            file_level: Level::default(),
            stdout_level: Level::default(),
            compress_rotated: false,
            timestamp_format: TimestampFormat::default(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn retention_minutes(mut self, minutes: u64) -> Self {
        self.retention_minutes = minutes;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn rotation_minutes(mut self, minutes: u64) -> Self {
        self.rotation_minutes = minutes;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_level(mut self, level: Level) -> Self {
        self.file_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stdout_level(mut self, level: Level) -> Self {
        self.stdout_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn compress_rotated(mut self, enabled: bool) -> Self {
        self.compress_rotated = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_prefix.is_empty() {
            return Err(LoggerError::config("LoggerConfig", "file prefix is empty"));
        }
        if self.file_prefix.contains(['/', '\\']) {
            return Err(LoggerError::config(
                "LoggerConfig",
                format!("file prefix '{}' contains a path separator", self.file_prefix),
            ));
        }
        if self.rotation_minutes == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "rotation interval must be at least one minute",
            ));
        }
        if self.rotation_minutes > MAX_ROTATION_MINUTES {
            return Err(LoggerError::config(
                "LoggerConfig",
                format!(
                    "rotation interval of {} minutes exceeds the maximum of {}",
                    self.rotation_minutes, MAX_ROTATION_MINUTES
                ),
            ));
        }
        Ok(())
    }

    /// Rotation settings for the file appender.
    ///
    /// A retention too long to represent in seconds saturates, which keeps
    /// files forever.
    pub fn rotation_policy(&self) -> RotationPolicy {
        RotationPolicy::new()
            .with_rotation(Duration::from_secs(self.rotation_minutes.saturating_mul(60)))
            .with_retention(Duration::from_secs(self.retention_minutes.saturating_mul(60)))
            .with_compression(self.compress_rotated)
    }
}
