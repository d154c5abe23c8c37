//! Console appender implementation

use crate::core::{Appender, LoggerError, Result};
use std::io::{self, Write};

enum Target {
    Stdout(io::Stdout),
    Redirected(Box<dyn Write + Send>),
}

/// Writes log lines to stdout, or to a redirected writer while one is set.
pub struct ConsoleAppender {
    target: Target,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            target: Target::Stdout(io::stdout()),
        }
    }

    /// Send all further output to `writer` instead of stdout
    pub fn redirect<W: Write + Send + 'static>(&mut self, writer: W) {
        self.target = Target::Redirected(Box::new(writer));
    }

    /// Go back to stdout; does nothing if output is not redirected
    pub fn restore(&mut self) {
        if !self.is_redirected() {
            return;
        }
        if let Target::Redirected(ref mut writer) = self.target {
            let _ = writer.flush();
        }
        self.target = Target::Stdout(io::stdout());
    }

    pub fn is_redirected(&self) -> bool {
        matches!(self.target, Target::Redirected(_))
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, bytes: &[u8]) -> Result<()> {
        let result = match self.target {
            Target::Stdout(ref stdout) => stdout.lock().write_all(bytes),
            Target::Redirected(ref mut writer) => writer.write_all(bytes),
        };
        result.map_err(|e| LoggerError::io_operation("writing to console", "write failed", e))
    }

    fn flush(&mut self) -> Result<()> {
        match self.target {
            Target::Stdout(ref stdout) => stdout.lock().flush()?,
            Target::Redirected(ref mut writer) => writer.flush()?,
        }
        Ok(())
    }
}
