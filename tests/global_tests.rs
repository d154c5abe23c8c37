//! Tests for the process-wide logger and the logging macros
//!
//! All tests here share one global logger, so each holds `SERIAL` for its
//! whole run and leaves the logger torn down.

mod common;

use common::{read_log_files, Screen, PREFIX};
use duosink::{fields, Level, LoggerConfig, LoggerError, TracedError};
use std::io;
use std::sync::{Mutex, MutexGuard};
use tempfile::TempDir;

static SERIAL: Mutex<()> = Mutex::new(());

/// Serializes access to the global logger and tears it down when dropped
struct Exclusive {
    _guard: MutexGuard<'static, ()>,
}

impl Exclusive {
    fn acquire() -> Self {
        let guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        duosink::tear_down();
        Self { _guard: guard }
    }
}

impl Drop for Exclusive {
    fn drop(&mut self) {
        duosink::tear_down();
    }
}

#[test]
fn test_setup_is_a_singleton() {
    let _lock = Exclusive::acquire();
    let base = TempDir::new().unwrap();
    let folders: Vec<_> = (0..5).map(|i| base.path().join(format!("run-{}", i))).collect();

    for active in [0, 2, 4] {
        duosink::setup(&folders[active], PREFIX, 2, 1);

        for (i, folder) in folders.iter().enumerate() {
            duosink::setup(folder, PREFIX, 2, 1);
            assert_eq!(folder.is_dir(), i == active, "run {}, folder {}", active, i);
        }

        duosink::tear_down();
        std::fs::remove_dir_all(&folders[active]).unwrap();
    }
}

#[test]
fn test_free_functions_and_macros() {
    let _lock = Exclusive::acquire();
    let dir = TempDir::new().unwrap();
    let screen = Screen::default();

    duosink::setup(dir.path(), PREFIX, 2, 1);
    duosink::set_stdout_level(Level::Debug);
    duosink::set_file_level(Level::Debug);
    duosink::redirect_stdout(screen.clone());

    duosink::debug("log-debug");
    duosink::info("info-debug");
    duosink::warn("warn-debug");
    duosink::debug!("macro {}", "debug");
    duosink::info!("macro {}", 1 + 1);
    duosink::warn!("macro warn");

    let err = TracedError::new("macro failure");
    duosink::error!(err);
    duosink::error!(err, "while handling request {}", 7);

    duosink::restore_stdout();

    let screen = screen.contents();
    for expected in [
        "log-debug",
        "info-debug",
        "warn-debug",
        "macro debug",
        "macro 2",
        "macro warn",
        "macro failure",
        "while handling request 7",
    ] {
        assert!(screen.contains(expected), "'{}' not on the console", expected);
    }

    let file = read_log_files(dir.path(), PREFIX);
    assert_eq!(file.lines().count(), 8);
    assert!(file.contains("\"msg\":\"while handling request 7\""));
    assert!(file.contains("\"error\":\"macro failure\""));
}

#[test]
fn test_entries_through_global() {
    let _lock = Exclusive::acquire();
    let dir = TempDir::new().unwrap();

    duosink::setup(dir.path(), PREFIX, 2, 1);
    duosink::set_stdout_level(Level::Off);

    duosink::with(fields! { "port" => 8080 }).info("listening").unwrap();
    duosink::with_error(&TracedError::new("refused"))
        .with(fields! { "host" => "db-1" })
        .error("database unavailable")
        .unwrap();

    let file = read_log_files(dir.path(), PREFIX);
    assert!(file.contains("\"port\":8080"));
    assert!(file.contains("\"host\":\"db-1\""));
    assert!(file.contains("\"error\":\"refused\""));
    assert!(file.contains("\"stack\":"));
}

#[test]
fn test_global_error_stack_starts_at_caller() {
    let _lock = Exclusive::acquire();
    let dir = TempDir::new().unwrap();

    duosink::setup(dir.path(), PREFIX, 2, 1);
    duosink::set_stdout_level(Level::Off);

    let err = io::Error::new(io::ErrorKind::Other, "plain");
    duosink::error(&err);
    duosink::print_error(&err, "friendly");

    let records = common::parse_records(&read_log_files(dir.path(), PREFIX));
    assert_eq!(records.len(), 2);
    for record in &records {
        let stack = record["stack"].as_str().unwrap();
        assert!(!stack.contains("duosink::global::"), "{}", stack);
        assert!(!stack.contains("duosink::core::"), "{}", stack);
        assert!(stack.contains("test_global_error_stack_starts_at_caller"), "{}", stack);
    }
}

#[test]
fn test_print_error_global() {
    let _lock = Exclusive::acquire();
    let dir = TempDir::new().unwrap();
    let screen = Screen::default();

    duosink::setup(dir.path(), PREFIX, 2, 1);
    duosink::redirect_stdout(screen.clone());
    duosink::set_stdout_level(Level::Off);

    duosink::print_error(&TracedError::new("socket closed"), "Lost connection");

    assert_eq!(screen.contents(), "Lost connection\n");
    assert!(read_log_files(dir.path(), PREFIX).contains("socket closed"));
}

#[test]
fn test_levels_follow_lifecycle() {
    let _lock = Exclusive::acquire();
    let dir = TempDir::new().unwrap();

    assert!(!duosink::is_active());
    assert_eq!(duosink::get_stdout_level(), Level::Off);
    assert_eq!(duosink::get_file_level(), Level::Off);

    duosink::setup(dir.path(), PREFIX, 2, 1);
    assert!(duosink::is_active());
    assert_eq!(duosink::get_stdout_level(), Level::Info);
    assert_eq!(duosink::get_file_level(), Level::Info);

    duosink::set_file_level(Level::Error);
    assert_eq!(duosink::get_file_level(), Level::Error);

    duosink::tear_down();
    assert!(!duosink::is_active());
    assert_eq!(duosink::get_file_level(), Level::Off);

    // no-ops once torn down
    duosink::info("nobody listening");
    duosink::error(&TracedError::new("nobody listening"));
    duosink::set_stdout_level(Level::Debug);
    assert_eq!(duosink::get_stdout_level(), Level::Off);
}

#[test]
fn test_try_setup_reports_invalid_config() {
    let _lock = Exclusive::acquire();
    let dir = TempDir::new().unwrap();

    let result = duosink::try_setup(&LoggerConfig::new(dir.path(), ""));
    assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    assert!(!duosink::is_active());

    duosink::try_setup(&LoggerConfig::new(dir.path(), PREFIX).stdout_level(Level::Warn))
        .unwrap();
    assert_eq!(duosink::get_stdout_level(), Level::Warn);
}

#[test]
#[should_panic(expected = "cannot set up logger")]
fn test_setup_panics_on_failure() {
    let _lock = Exclusive::acquire();
    let dir = TempDir::new().unwrap();

    duosink::setup(dir.path(), PREFIX, 2, 0);
}
