//! # duosink
//!
//! Structured logging to two sinks at once: a rotating JSON log file for
//! machines, and colored human-readable text on the console. Each sink has
//! its own minimum level.
//!
//! ## Basics
//!
//! Set the logger up once, at the start of the application:
//!
//! ```no_run
//! // keep 7 days of logs, start a new file every day
//! duosink::setup("/var/log/myapp", "myapp", 60 * 24 * 7, 60 * 24);
//! ```
//!
//! Then log messages at debug, info or warn level:
//!
//! ```no_run
//! duosink::info("Server started");
//! duosink::info!("Listening on port {}", 8080);
//! ```
//!
//! Values worth searching on belong in fields rather than in the message:
//!
//! ```no_run
//! use duosink::fields;
//!
//! let _ = duosink::with(fields! { "port" => 8080, "tls" => true }).info("Server started");
//! ```
//!
//! ## Errors
//!
//! Errors are logged at error level, and only there: attaching an error with
//! `with_error` gives an [`ErrorEntry`], which has no other finalizer. The
//! message is optional; an empty one is replaced by the error text.
//!
//! ```no_run
//! use duosink::{fields, TracedError};
//!
//! let err = TracedError::new("connection refused");
//!
//! duosink::error(&err);
//! let _ = duosink::with_error(&err)
//!     .with(fields! { "host" => "db-1" })
//!     .error("Database unavailable");
//! ```
//!
//! ## Stack traces
//!
//! The log file receives the stack trace of every logged error under the
//! `stack` field; the console never shows it. The trace is the one captured
//! by the first [`TracedError`] found in the error's source chain, or one
//! captured at the logging call site if there is none.
//!
//! ## Independent loggers
//!
//! The free functions drive one process-wide [`Logger`]. Libraries and tests
//! can create their own handles instead:
//!
//! ```no_run
//! use duosink::{Level, Logger, LoggerConfig};
//!
//! let logger = Logger::new();
//! logger.setup(&LoggerConfig::new("/tmp/logs", "worker").stdout_level(Level::Warn))?;
//! logger.debug("only in the file if its level allows it")?;
//! logger.tear_down();
//! # Ok::<(), duosink::LoggerError>(())
//! ```

pub mod appenders;
pub mod core;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
    pub use crate::core::{
        Appender, Entry, ErrorEntry, FieldValue, Fields, Level, Logger, LoggerConfig,
        LoggerError, Result, TracedError,
    };
    pub use crate::fields;
}

pub use self::appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
pub use self::core::{
    extract, parse_level, Appender, Entry, ErrorEntry, Extracted, FieldValue, Fields, Formatter,
    Level, Logger, LoggerConfig, LoggerError, OutputFormat, Record, Result, SinkHook,
    TimestampFormat, TracedError, ERROR_KEY, STACK_KEY,
};
pub use self::global::{
    debug, error, get_file_level, get_stdout_level, info, is_active, logger, print_error,
    redirect_stdout, restore_stdout, set_file_level, set_stdout_level, setup, setup_with,
    tear_down, try_setup, warn, with, with_error,
};
