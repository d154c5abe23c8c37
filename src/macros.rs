//! Logging macros for the process-wide logger.
//!
//! These format their arguments like `format!` and log through
//! [`crate::global`].
//!
//! # Examples
//!
//! ```no_run
//! use duosink::{info, warn, TracedError};
//!
//! duosink::setup("/tmp/logs", "app", 60, 10);
//!
//! let port = 8080;
//! info!("Server listening on port {}", port);
//! warn!("Disk usage at {}%", 91);
//!
//! let err = TracedError::new("connection reset");
//! duosink::error!(err, "Lost client {}", 42);
//! ```
//!
//! Prefer [`crate::with`] when a value is worth searching on; formatting it
//! into the message buries it.

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::global::debug(format!($($arg)+))
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::global::info(format!($($arg)+))
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::global::warn(format!($($arg)+))
    };
}

/// Log an error, optionally with a formatted complementary message.
///
/// `error!(err)` logs the error on its own; `error!(err, "fmt", args..)`
/// attaches a message as well.
#[macro_export]
macro_rules! error {
    ($err:expr) => {
        $crate::global::error(&$err)
    };
    ($err:expr, $($arg:tt)+) => {
        $crate::global::report($crate::global::with_error(&$err).error(format!($($arg)+)))
    };
}
