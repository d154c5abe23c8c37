//! Time-windowed rotating file appender
//!
//! Log lines go to `<dir>/<YYYYmmddHHMM>-<prefix>.json`, where the timestamp is
//! the start of the current rotation window in local time. A `<prefix>.log`
//! symlink in the same directory always points at the active file. Files older
//! than the retention window are purged whenever a new window starts.

use crate::core::appender::Appender;
use crate::core::error::{LoggerError, Result};
use chrono::{DateTime, Local, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// When to start a new file and how long to keep old ones
///
/// # Examples
///
/// ```
/// use duosink::appenders::RotationPolicy;
/// use std::time::Duration;
///
/// // New file every hour, keep a day of history, gzip old files
/// let policy = RotationPolicy::new()
///     .with_rotation(Duration::from_secs(3600))
///     .with_retention(Duration::from_secs(24 * 3600))
///     .with_compression(true);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Length of one rotation window
    pub rotation: Duration,
    /// Age after which rotated files are deleted; zero keeps them forever
    pub retention: Duration,
    /// Whether to gzip files once their window has passed
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            rotation: Duration::from_secs(24 * 3600),
            retention: Duration::from_secs(7 * 24 * 3600),
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_rotation(mut self, rotation: Duration) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

/// Rotating file appender writing one file per rotation window
pub struct RotatingFileAppender {
    directory: PathBuf,
    prefix: String,
    policy: RotationPolicy,
    file: Option<File>,
    current_path: PathBuf,
    /// Start of the active window, in seconds since the epoch
    current_window: i64,
}

impl RotatingFileAppender {
    /// Open the file for the current window inside `directory`.
    ///
    /// The directory must already exist.
    ///
    /// # Errors
    ///
    /// Returns error if the policy is invalid or the file cannot be opened
    pub fn new<P: AsRef<Path>>(
        directory: P,
        prefix: impl Into<String>,
        policy: RotationPolicy,
    ) -> Result<Self> {
        Self::open_at(directory.as_ref(), prefix.into(), policy, Utc::now())
    }

    fn open_at(
        directory: &Path,
        prefix: String,
        policy: RotationPolicy,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if policy.rotation.as_secs() == 0 {
            return Err(LoggerError::config(
                "RotationPolicy",
                "rotation interval must be at least one second",
            ));
        }
        if i64::try_from(policy.rotation.as_secs()).is_err() {
            return Err(LoggerError::config(
                "RotationPolicy",
                "rotation interval is too long",
            ));
        }
        if prefix.is_empty() {
            return Err(LoggerError::config("RotatingFileAppender", "file prefix is empty"));
        }

        let mut appender = Self {
            directory: directory.to_path_buf(),
            prefix,
            policy,
            file: None,
            current_path: PathBuf::new(),
            current_window: 0,
        };

        let window = appender.window_start(now);
        appender.open_window(window)?;
        appender.purge_expired();

        Ok(appender)
    }

    /// Start of the window containing `now`
    fn window_start(&self, now: DateTime<Utc>) -> i64 {
        let secs = self.policy.rotation.as_secs() as i64;
        now.timestamp().div_euclid(secs) * secs
    }

    /// File path for the window starting at `window`
    fn path_for(&self, window: i64) -> PathBuf {
        let stamp = DateTime::<Utc>::from_timestamp(window, 0)
            .map(|t| t.with_timezone(&Local).format("%Y%m%d%H%M").to_string())
            .unwrap_or_else(|| window.to_string());
        self.directory
            .join(format!("{}-{}.json", stamp, self.prefix))
    }

    /// Path of the symlink that tracks the active file
    #[must_use]
    pub fn link_path(&self) -> PathBuf {
        self.directory.join(format!("{}.log", self.prefix))
    }

    /// Path of the file currently written to
    #[must_use]
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    fn open_window(&mut self, window: i64) -> Result<()> {
        let path = self.path_for(window);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    path.display().to_string(),
                    format!("Failed to open log file: {}", e),
                )
            })?;

        self.file = Some(file);
        self.current_path = path;
        self.current_window = window;
        self.update_link();
        Ok(())
    }

    #[cfg(unix)]
    fn update_link(&self) {
        let link = self.link_path();
        let target = match self.current_path.file_name() {
            Some(name) => PathBuf::from(name),
            None => return,
        };

        if fs::symlink_metadata(&link).is_ok() {
            if let Err(e) = fs::remove_file(&link) {
                eprintln!(
                    "[LOGGER WARNING] Failed to replace log link {}: {}",
                    link.display(),
                    e
                );
                return;
            }
        }
        if let Err(e) = std::os::unix::fs::symlink(&target, &link) {
            eprintln!(
                "[LOGGER WARNING] Failed to create log link {}: {}",
                link.display(),
                e
            );
        }
    }

    #[cfg(not(unix))]
    fn update_link(&self) {}

    /// Move to the window starting at `window`
    fn rotate(&mut self, window: i64) -> Result<()> {
        let next_path = self.path_for(window);
        if next_path == self.current_path {
            // Two windows can share a minute-resolution name
            self.current_window = window;
            return Ok(());
        }

        if let Some(mut file) = self.file.take() {
            file.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.current_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        let previous = self.current_path.clone();
        self.open_window(window)?;

        if self.policy.compress && previous.exists() {
            if let Err(e) = compress_file(&previous) {
                eprintln!(
                    "[LOGGER WARNING] Failed to compress rotated log {}: {}",
                    previous.display(),
                    e
                );
            }
        }

        self.purge_expired();
        Ok(())
    }

    fn is_managed_file(&self, name: &str) -> bool {
        let plain = format!("-{}.json", self.prefix);
        let compressed = format!("-{}.json.gz", self.prefix);
        name.ends_with(&plain) || name.ends_with(&compressed)
    }

    /// Delete managed files whose modification time is past the retention window
    fn purge_expired(&self) {
        if self.policy.retention.is_zero() {
            return;
        }
        let cutoff = match SystemTime::now().checked_sub(self.policy.retention) {
            Some(cutoff) => cutoff,
            None => return,
        };

        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!(
                    "[LOGGER WARNING] Failed to list log directory {}: {}",
                    self.directory.display(),
                    e
                );
                return;
            }
        };

        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path == self.current_path {
                continue;
            }
            let managed = entry
                .file_name()
                .to_str()
                .map(|name| self.is_managed_file(name))
                .unwrap_or(false);
            if !managed {
                continue;
            }

            let expired = fs::symlink_metadata(&path)
                .and_then(|m| m.modified())
                .map(|modified| modified < cutoff)
                .unwrap_or(false);
            if expired {
                if let Err(e) = fs::remove_file(&path) {
                    eprintln!(
                        "[LOGGER WARNING] Failed to remove expired log {}: {}",
                        path.display(),
                        e
                    );
                }
            }
        }
    }

    fn append_at(&mut self, bytes: &[u8], now: DateTime<Utc>) -> Result<()> {
        let window = self.window_start(now);
        if window != self.current_window {
            if let Err(e) = self.rotate(window) {
                eprintln!(
                    "[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.",
                    e
                );
                if self.file.is_none() {
                    let current = self.current_window;
                    self.open_window(current)?;
                }
            }
        }

        match self.file {
            Some(ref mut file) => file.write_all(bytes).map_err(|e| {
                LoggerError::io_operation(
                    "writing log file",
                    self.current_path.display().to_string(),
                    e,
                )
            }),
            None => Err(LoggerError::writer("Writer not initialized")),
        }
    }
}

/// Gzip `path` to `<path>.gz`, removing the original only once compression
/// has fully succeeded.
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, BufWriter};

    let mut gz_name = path.as_os_str().to_owned();
    gz_name.push(".gz");
    let gz_path = PathBuf::from(gz_name);
    let temp_gz_path = gz_path.with_extension("gz.tmp");

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp_gz_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to create temporary compressed file: {}", temp_gz_path.display()),
            e,
        )
    })?;
    let buffered_output = BufWriter::with_capacity(64 * 1024, output);
    let mut encoder = flate2::write::GzEncoder::new(buffered_output, flate2::Compression::default());

    let streamed = std::io::copy(&mut reader, &mut encoder)
        .and_then(|_| encoder.finish())
        .and_then(|mut inner| inner.flush());
    if let Err(e) = streamed {
        let _ = fs::remove_file(&temp_gz_path);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARNING] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }

    Ok(())
}

impl Appender for RotatingFileAppender {
    fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.append_at(bytes, Utc::now())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut file) = self.file {
            file.flush().map_err(|e| {
                LoggerError::io_operation(
                    "flushing log file",
                    self.current_path.display().to_string(),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }
    }
}
