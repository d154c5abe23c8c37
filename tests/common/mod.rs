#![allow(dead_code)]

use duosink::{Level, Logger, LoggerConfig};
use parking_lot::Mutex;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const PREFIX: &str = "mysuffix";

/// In-memory console replacement
#[derive(Clone, Default)]
pub struct Screen(Arc<Mutex<Vec<u8>>>);

impl Screen {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for Screen {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A logger writing into a fresh temp directory, console captured
pub struct Harness {
    pub dir: TempDir,
    pub logger: Logger,
    pub screen: Screen,
}

impl Harness {
    pub fn new(file_level: Level, stdout_level: Level) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let logger = Logger::new();
        logger
            .setup(
                &LoggerConfig::new(dir.path(), PREFIX)
                    .file_level(file_level)
                    .stdout_level(stdout_level),
            )
            .expect("Failed to set up logger");

        let screen = Screen::default();
        logger.redirect_stdout(screen.clone());

        Self { dir, logger, screen }
    }

    pub fn file_contents(&self) -> String {
        read_log_files(self.dir.path(), PREFIX)
    }

    pub fn file_records(&self) -> Vec<serde_json::Value> {
        parse_records(&self.file_contents())
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.logger.tear_down();
    }
}

/// Timestamped log files for `prefix` in `dir`, oldest first
pub fn log_files(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    let suffix = format!("-{}.json", prefix);
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .expect("Failed to read log directory")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map_or(false, |name| name.ends_with(&suffix))
        })
        .collect();
    paths.sort();
    paths
}

/// Concatenated contents of every log file, in window order
pub fn read_log_files(dir: &Path, prefix: &str) -> String {
    log_files(dir, prefix)
        .iter()
        .map(|path| fs::read_to_string(path).expect("Failed to read log file"))
        .collect()
}

pub fn parse_records(contents: &str) -> Vec<serde_json::Value> {
    contents
        .lines()
        .map(|line| serde_json::from_str(line).expect("Log line is not valid JSON"))
        .collect()
}
