//! Process-wide default logger
//!
//! Free functions mirroring the [`Logger`] API over a single lazily created
//! instance, for applications that want to log from anywhere without passing
//! a handle around.
//!
//! ```no_run
//! use duosink::{fields, Level, TracedError};
//!
//! duosink::setup("/var/log/myapp", "myapp", 60 * 24 * 7, 60 * 24);
//! duosink::set_stdout_level(Level::Warn);
//!
//! duosink::info("Server started");
//! let _ = duosink::with(fields! { "port" => 8080 }).info("Listening");
//!
//! let err = TracedError::new("connection refused");
//! duosink::print_error(&err, "Could not reach the server, is it running?");
//!
//! duosink::tear_down();
//! ```
//!
//! Functions without a return value report write failures on stderr instead
//! of returning them; a failing sink never interrupts the caller.

use crate::core::{Entry, ErrorEntry, Fields, Level, Logger, LoggerConfig, Result};
use std::error::Error as StdError;
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// The process-wide logger handle
pub fn logger() -> &'static Logger {
    GLOBAL.get_or_init(Logger::new)
}

#[doc(hidden)]
pub fn report(result: Result<()>) {
    if let Err(e) = result {
        eprintln!("[LOGGER ERROR] Failed to write log entry: {}", e);
    }
}

/// Set up the process-wide logger with default levels.
///
/// Ignored if the logger is already set up.
///
/// # Panics
///
/// Panics if the log directory or the log file cannot be created; the
/// application is not expected to run without its logs.
pub fn setup(
    directory: impl AsRef<Path>,
    file_prefix: &str,
    retention_minutes: u64,
    rotation_minutes: u64,
) {
    let config = LoggerConfig::new(directory.as_ref(), file_prefix)
        .retention_minutes(retention_minutes)
        .rotation_minutes(rotation_minutes);
    setup_with(&config);
}

/// Like [`setup`], taking a full configuration.
///
/// # Panics
///
/// Panics if setup fails; see [`try_setup`] for the fallible form.
pub fn setup_with(config: &LoggerConfig) {
    if let Err(e) = try_setup(config) {
        panic!("cannot set up logger: {}", e);
    }
}

/// Set up the process-wide logger, returning setup failures.
pub fn try_setup(config: &LoggerConfig) -> Result<()> {
    logger().setup(config)
}

/// Disable the process-wide logger; later calls are no-ops until the next setup
pub fn tear_down() {
    logger().tear_down();
}

pub fn is_active() -> bool {
    logger().is_active()
}

/// A new entry with the given fields; see [`Logger::with`]
pub fn with(fields: Fields) -> Entry {
    logger().with(fields)
}

/// A new error-locked entry; see [`Logger::with_error`]
pub fn with_error(err: &(dyn StdError + 'static)) -> ErrorEntry {
    logger().with_error(err)
}

pub fn debug(message: impl Into<String>) {
    report(logger().debug(message));
}

pub fn info(message: impl Into<String>) {
    report(logger().info(message));
}

pub fn warn(message: impl Into<String>) {
    report(logger().warn(message));
}

/// Log `err` at error level, with its stack trace in the log file
pub fn error(err: &(dyn StdError + 'static)) {
    report(logger().error(err));
}

/// Log `err` and show `message` on the console if console logging is off.
///
/// See [`Logger::print_error`].
pub fn print_error(err: &(dyn StdError + 'static), message: &str) {
    report(logger().print_error(err, message));
}

pub fn set_file_level(level: Level) {
    logger().set_file_level(level);
}

pub fn set_stdout_level(level: Level) {
    logger().set_stdout_level(level);
}

pub fn get_file_level() -> Level {
    logger().file_level()
}

pub fn get_stdout_level() -> Level {
    logger().stdout_level()
}

/// Send console output to `writer`. Only meant for tests.
pub fn redirect_stdout<W: Write + Send + 'static>(writer: W) {
    logger().redirect_stdout(writer);
}

/// Undo [`redirect_stdout`]. Only meant for tests.
pub fn restore_stdout() {
    logger().restore_stdout();
}
