//! Logger state shared by every entry
//!
//! A [`Logger`] is a cheap, cloneable handle to one set of sinks. It starts
//! inactive; [`Logger::setup`] installs the file and console hooks and
//! [`Logger::tear_down`] removes them again. While inactive, finalizing an
//! entry does nothing and returns `Ok(())`.
//!
//! Configuration changes take the write side of the state lock. Dispatch
//! holds the read side while formatting and writing to both sinks, so a
//! change never lands halfway through a record.

use super::config::LoggerConfig;
use super::entry::{Entry, ErrorEntry};
use super::error::{LoggerError, Result};
use super::fields::Fields;
use super::hook::SinkHook;
use super::log_level::Level;
use super::output_format::{Formatter, OutputFormat};
use super::record::Record;
use crate::appenders::{ConsoleAppender, RotatingFileAppender};
use parking_lot::RwLock;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::sync::Arc;

struct Sinks {
    file: SinkHook<RotatingFileAppender>,
    stdout: SinkHook<ConsoleAppender>,
}

impl Sinks {
    fn build(config: &LoggerConfig) -> Result<Self> {
        fs::create_dir_all(&config.directory).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", config.directory.display()),
                e,
            )
        })?;

        let rotating = RotatingFileAppender::new(
            &config.directory,
            config.file_prefix.clone(),
            config.rotation_policy(),
        )?;

        let json = Formatter::new(OutputFormat::Json {
            timestamp: config.timestamp_format.clone(),
        });
        let file = SinkHook::new(rotating, json, true).with_level(config.file_level);
        let stdout = SinkHook::new(ConsoleAppender::new(), Formatter::text(true), false)
            .with_level(config.stdout_level);

        Ok(Self { file, stdout })
    }

    /// Fire both hooks; the second runs even if the first fails
    fn fire(&self, record: &Record) -> Result<()> {
        let file = self.file.fire(record);
        let stdout = self.stdout.fire(record);
        file.and(stdout)
    }
}

#[derive(Clone, Default)]
pub struct Logger {
    state: Arc<RwLock<Option<Sinks>>>,
}

impl Logger {
    /// An inactive logger; call [`Logger::setup`] to start writing
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the log directory and both sinks.
    ///
    /// Does nothing if the logger is already set up.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid, or the directory or
    /// the log file cannot be created
    pub fn setup(&self, config: &LoggerConfig) -> Result<()> {
        let mut state = self.state.write();
        if state.is_some() {
            return Ok(());
        }

        config.validate()?;
        *state = Some(Sinks::build(config)?);
        Ok(())
    }

    /// Flush and drop both sinks; later log calls become no-ops until the
    /// next setup
    pub fn tear_down(&self) {
        let mut state = self.state.write();
        if let Some(sinks) = state.take() {
            if let Err(e) = sinks.file.flush() {
                eprintln!("[LOGGER ERROR] Failed to flush log file during teardown: {}", e);
            }
            if let Err(e) = sinks.stdout.flush() {
                eprintln!("[LOGGER ERROR] Failed to flush console during teardown: {}", e);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.read().is_some()
    }

    pub fn set_file_level(&self, level: Level) {
        if let Some(sinks) = self.state.write().as_mut() {
            sinks.file.set_level(level);
        }
    }

    pub fn set_stdout_level(&self, level: Level) {
        if let Some(sinks) = self.state.write().as_mut() {
            sinks.stdout.set_level(level);
        }
    }

    /// Level of the file sink, `Off` while inactive
    pub fn file_level(&self) -> Level {
        self.state
            .read()
            .as_ref()
            .map(|sinks| sinks.file.level())
            .unwrap_or(Level::Off)
    }

    /// Level of the console sink, `Off` while inactive
    pub fn stdout_level(&self) -> Level {
        self.state
            .read()
            .as_ref()
            .map(|sinks| sinks.stdout.level())
            .unwrap_or(Level::Off)
    }

    /// Send console output to `writer` instead of stdout.
    ///
    /// Meant for tests; to silence the console use
    /// `set_stdout_level(Level::Off)`.
    pub fn redirect_stdout<W: Write + Send + 'static>(&self, writer: W) {
        if let Some(sinks) = self.state.write().as_mut() {
            sinks.stdout.appender_mut().redirect(writer);
        }
    }

    /// Undo [`Logger::redirect_stdout`]; a no-op when not redirected
    pub fn restore_stdout(&self) {
        if let Some(sinks) = self.state.write().as_mut() {
            sinks.stdout.appender_mut().restore();
        }
    }

    /// A new entry carrying `fields`; nothing is logged until it is finalized
    pub fn with(&self, fields: Fields) -> Entry {
        Entry::new(self.clone(), fields)
    }

    /// A new error-locked entry carrying `err`'s message and stack trace
    pub fn with_error(&self, err: &(dyn StdError + 'static)) -> ErrorEntry {
        self.with(Fields::new()).with_error(err)
    }

    pub fn debug(&self, message: impl Into<String>) -> Result<()> {
        self.with(Fields::new()).debug(message)
    }

    pub fn info(&self, message: impl Into<String>) -> Result<()> {
        self.with(Fields::new()).info(message)
    }

    pub fn warn(&self, message: impl Into<String>) -> Result<()> {
        self.with(Fields::new()).warn(message)
    }

    pub fn error(&self, err: &(dyn StdError + 'static)) -> Result<()> {
        self.with(Fields::new()).error(err)
    }

    /// Log `err` at error level and show `message` to the user.
    ///
    /// The error always goes through both sinks. `message` is written
    /// verbatim, followed by a newline, to the console appender, but only
    /// while the console level is `Off`; otherwise the console already shows
    /// the error and the message would duplicate it.
    pub fn print_error(&self, err: &(dyn StdError + 'static), message: &str) -> Result<()> {
        let fields = self.with_error(err).fields().clone();
        let record = Record::new(Level::Error, String::new(), fields);

        let state = self.state.read();
        let sinks = match state.as_ref() {
            Some(sinks) => sinks,
            None => return Ok(()),
        };

        let logged = sinks.fire(&record);
        let printed = if sinks.stdout.level() == Level::Off {
            sinks.stdout.write_raw(format!("{}\n", message).as_bytes())
        } else {
            Ok(())
        };
        logged.and(printed)
    }

    /// Flush both appenders
    pub fn flush(&self) -> Result<()> {
        match self.state.read().as_ref() {
            Some(sinks) => sinks.file.flush().and(sinks.stdout.flush()),
            None => Ok(()),
        }
    }

    pub(crate) fn dispatch(&self, record: Record) -> Result<()> {
        match self.state.read().as_ref() {
            Some(sinks) => sinks.fire(&record),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("active", &self.is_active())
            .finish()
    }
}
