//! Error message and stack trace extraction
//!
//! Errors built with [`TracedError`] capture a stack trace where they are
//! created. Any other error gets a trace captured at the point of
//! extraction, which means the recorded origin is the logging call rather than
//! the original failure. Use `TracedError` when the real origin matters.

use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

/// Error that records the call stack at construction time.
pub struct TracedError {
    message: String,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl TracedError {
    /// A new error with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
            backtrace: Backtrace::force_capture(),
        }
    }

    /// Capture a trace for an existing error, keeping its message
    pub fn wrap<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: err.to_string(),
            source: Some(Box::new(err)),
            backtrace: Backtrace::force_capture(),
        }
    }

    /// Capture a trace for an existing error, prefixing its message as
    /// `"<message>: <err>"`
    pub fn context<E>(message: impl Into<String>, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: format!("{}: {}", message.into(), err),
            source: Some(Box::new(err)),
            backtrace: Backtrace::force_capture(),
        }
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedError")
            .field("message", &self.message)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl StdError for TracedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Message and stack trace pulled out of an error value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub message: String,
    pub stack: String,
}

/// Extract the message and a stack trace from `err`.
///
/// The first [`TracedError`] found walking `err` and its `source()` chain
/// supplies the stack; without one, a trace of the current call site is
/// captured instead. Either way the trace starts at the first frame outside
/// this crate.
pub fn extract(err: &(dyn StdError + 'static)) -> Extracted {
    let message = err.to_string();

    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(traced) = e.downcast_ref::<TracedError>() {
            return Extracted {
                message,
                stack: caller_frames(&traced.backtrace().to_string()),
            };
        }
        current = e.source();
    }

    Extracted {
        message,
        stack: caller_frames(&Backtrace::force_capture().to_string()),
    }
}

/// Symbol prefixes of frames that sit above the caller in a fresh capture
const INTERNAL_PREFIXES: &[&str] = &[
    concat!(env!("CARGO_CRATE_NAME"), "::"),
    concat!("<", env!("CARGO_CRATE_NAME"), "::"),
    "std::",
    "<std::",
    "core::",
    "<core::",
];

/// Frame index of a rendered `   3: symbol` header line, with its symbol
fn frame_header(line: &str) -> Option<&str> {
    let (index, symbol) = line.trim_start().split_once(": ")?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(symbol)
}

/// Drop the leading frames of a rendered backtrace that belong to this crate
/// or to the standard library's capture machinery, and renumber the rest.
///
/// A trace made only of such frames is returned unchanged.
fn caller_frames(rendered: &str) -> String {
    let mut frames: Vec<(&str, Vec<&str>)> = Vec::new();
    for line in rendered.lines() {
        match frame_header(line) {
            Some(symbol) => frames.push((symbol, Vec::new())),
            None => {
                if let Some((_, details)) = frames.last_mut() {
                    details.push(line);
                }
            }
        }
    }

    let skip = frames
        .iter()
        .take_while(|(symbol, _)| INTERNAL_PREFIXES.iter().any(|p| symbol.starts_with(p)))
        .count();
    if skip == 0 || skip == frames.len() {
        return rendered.to_string();
    }

    let mut out = String::with_capacity(rendered.len());
    for (index, (symbol, details)) in frames[skip..].iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{:4}: {}", index, symbol));
        for line in details {
            out.push('\n');
            out.push_str(line);
        }
    }
    out
}
