//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod entry;
pub mod error;
pub mod extract;
pub mod fields;
pub mod hook;
pub mod log_level;
pub mod logger;
pub mod output_format;
pub mod record;
pub mod timestamp;

pub use appender::Appender;
pub use config::LoggerConfig;
pub use entry::{Entry, ErrorEntry};
pub use error::{LoggerError, Result};
pub use extract::{extract, Extracted, TracedError};
pub use fields::{FieldValue, Fields};
pub use hook::SinkHook;
pub use log_level::{parse_level, Level};
pub use logger::Logger;
pub use output_format::{Formatter, OutputFormat};
pub use record::{Record, ERROR_KEY, STACK_KEY};
pub use timestamp::TimestampFormat;
