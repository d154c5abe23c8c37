//! Immutable log entry builders
//!
//! An [`Entry`] collects custom fields and is finalized at debug, info or warn
//! level with a message, or at error level with an error value. Attaching an
//! error with [`Entry::with_error`] yields an [`ErrorEntry`], which can only be
//! finalized at error level, taking an optional complementary message:
//!
//! ```no_run
//! use duosink::{fields, Logger, LoggerConfig, TracedError};
//!
//! let logger = Logger::new();
//! logger.setup(&LoggerConfig::new("/tmp/logs", "app"))?;
//!
//! let err = TracedError::new("connection refused");
//!
//! logger.with(fields! { "port" => 8080 }).info("Server started")?;
//! logger.with(fields! { "port" => 8080 }).with_error(&err).error("oops")?;
//! logger.with_error(&err).error("")?;
//! # Ok::<(), duosink::LoggerError>(())
//! ```
//!
//! Chaining never modifies the entry it is called on; every step returns a
//! new entry holding its own copy of the fields.

use super::error::Result;
use super::extract::extract;
use super::fields::Fields;
use super::log_level::Level;
use super::logger::Logger;
use super::record::{Record, ERROR_KEY, STACK_KEY};
use std::error::Error as StdError;

/// Fields describing `err`: its message under `error` and, when one is
/// available, its stack trace under `stack`.
fn error_fields(err: &(dyn StdError + 'static)) -> Fields {
    let extracted = extract(err);
    let mut fields = Fields::new().with_field(ERROR_KEY, extracted.message);
    if !extracted.stack.is_empty() {
        fields.insert(STACK_KEY, extracted.stack);
    }
    fields
}

/// A pending log entry without an attached error
#[derive(Clone, Debug)]
#[must_use = "entries are not logged until finalized with debug, info, warn or error"]
pub struct Entry {
    logger: Logger,
    fields: Fields,
}

impl Entry {
    pub(crate) fn new(logger: Logger, fields: Fields) -> Self {
        Self { logger, fields }
    }

    /// A new entry with `fields` merged over this entry's fields
    pub fn with(&self, fields: Fields) -> Entry {
        Entry::new(self.logger.clone(), self.fields.merged(&fields))
    }

    /// A new error-locked entry carrying `err`'s message and stack trace
    pub fn with_error(&self, err: &(dyn StdError + 'static)) -> ErrorEntry {
        ErrorEntry::new(self.logger.clone(), self.fields.merged(&error_fields(err)))
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn debug(self, message: impl Into<String>) -> Result<()> {
        self.finish(Level::Debug, message.into())
    }

    pub fn info(self, message: impl Into<String>) -> Result<()> {
        self.finish(Level::Info, message.into())
    }

    pub fn warn(self, message: impl Into<String>) -> Result<()> {
        self.finish(Level::Warn, message.into())
    }

    /// Log `err` at error level; the message is the error's own text
    pub fn error(self, err: &(dyn StdError + 'static)) -> Result<()> {
        self.with_error(err).error("")
    }

    fn finish(self, level: Level, message: String) -> Result<()> {
        self.logger.dispatch(Record::new(level, message, self.fields))
    }
}

/// A pending log entry locked to error level by an attached error
#[derive(Clone, Debug)]
#[must_use = "entries are not logged until finalized with error"]
pub struct ErrorEntry {
    logger: Logger,
    fields: Fields,
}

impl ErrorEntry {
    pub(crate) fn new(logger: Logger, fields: Fields) -> Self {
        Self { logger, fields }
    }

    /// A new entry with `fields` merged over this entry's fields
    pub fn with(&self, fields: Fields) -> ErrorEntry {
        ErrorEntry::new(self.logger.clone(), self.fields.merged(&fields))
    }

    /// A new entry whose `error` and `stack` come from `err`; other fields
    /// are kept
    pub fn with_error(&self, err: &(dyn StdError + 'static)) -> ErrorEntry {
        let mut fields = self.fields.clone();
        fields.remove(STACK_KEY);
        fields.merge(&error_fields(err));
        ErrorEntry::new(self.logger.clone(), fields)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Log at error level. An empty `message` is replaced by the error text.
    pub fn error(self, message: impl Into<String>) -> Result<()> {
        self.logger
            .dispatch(Record::new(Level::Error, message.into(), self.fields))
    }
}
