//! Finished log records handed to sink hooks

use super::fields::Fields;
use super::log_level::Level;
use chrono::{DateTime, Utc};
use std::borrow::Cow;

/// Field key holding the extracted error message
pub const ERROR_KEY: &str = "error";
/// Field key holding the captured stack trace
pub const STACK_KEY: &str = "stack";

/// A completed log entry: severity, message, creation time and fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub level: Level,
    pub message: String,
    pub time: DateTime<Utc>,
    pub fields: Fields,
}

impl Record {
    pub fn new(level: Level, message: impl Into<String>, fields: Fields) -> Self {
        Self {
            level,
            message: message.into(),
            time: Utc::now(),
            fields,
        }
    }

    /// The record as a sink with the given stack visibility should render it.
    ///
    /// Only error records are rewritten; everything else is returned as-is.
    /// For errors, on a private copy:
    ///
    /// 1. an `error` field holding a string, `Display` or error value is
    ///    replaced by its text;
    /// 2. an empty message takes the `error` text;
    /// 3. an `error` field whose text equals the message is dropped;
    /// 4. the `stack` field is dropped when `show_stack` is false.
    ///
    /// The steps run in this order because each reads what the previous one
    /// wrote. `self` is never modified.
    pub fn rewritten(&self, show_stack: bool) -> Cow<'_, Record> {
        if self.level != Level::Error {
            return Cow::Borrowed(self);
        }

        let mut out = self.clone();

        let error_text = out.fields.get(ERROR_KEY).and_then(|v| v.as_text());

        if let Some(text) = &error_text {
            out.fields.insert(ERROR_KEY, text.as_str());

            if out.message.is_empty() && !text.is_empty() {
                out.message = text.clone();
            }

            if out.message == *text {
                out.fields.remove(ERROR_KEY);
            }
        }

        if !show_stack {
            out.fields.remove(STACK_KEY);
        }

        Cow::Owned(out)
    }
}
