//! Appender trait for log output destinations

use super::error::Result;

/// Destination receiving fully formatted log lines.
///
/// Appenders are driven from behind a mutex, so they only need to be `Send`.
pub trait Appender: Send {
    fn append(&mut self, bytes: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}
