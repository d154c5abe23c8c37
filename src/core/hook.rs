//! Level-gated sink hooks
//!
//! A hook couples an appender with a minimum level, a formatter and a stack
//! visibility flag. The logger owns exactly two of them: one for the log
//! files and one for the console.

use super::appender::Appender;
use super::error::Result;
use super::log_level::Level;
use super::output_format::Formatter;
use super::record::Record;
use parking_lot::Mutex;

pub struct SinkHook<A: Appender> {
    level: Level,
    appender: Mutex<A>,
    formatter: Formatter,
    show_error_stack: bool,
}

impl<A: Appender> SinkHook<A> {
    /// A hook at the default `Info` level
    pub fn new(appender: A, formatter: Formatter, show_error_stack: bool) -> Self {
        Self {
            level: Level::default(),
            appender: Mutex::new(appender),
            formatter,
            show_error_stack,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    pub fn shows_error_stack(&self) -> bool {
        self.show_error_stack
    }

    /// Format and write `record` if this hook's level lets it through.
    ///
    /// Error records are rewritten on a private copy first, so nothing this
    /// hook hides or changes is visible to the caller or to other hooks.
    pub fn fire(&self, record: &Record) -> Result<()> {
        if !self.level.accepts(record.level) {
            return Ok(());
        }

        let view = record.rewritten(self.show_error_stack);
        let bytes = self.formatter.format(&view)?;
        self.appender.lock().append(&bytes)
    }

    /// Write `bytes` to the appender unformatted, bypassing the level check
    pub fn write_raw(&self, bytes: &[u8]) -> Result<()> {
        self.appender.lock().append(bytes)
    }

    pub fn flush(&self) -> Result<()> {
        self.appender.lock().flush()
    }

    /// Direct access to the appender; needs exclusive access to the hook
    pub fn appender_mut(&mut self) -> &mut A {
        self.appender.get_mut()
    }
}
