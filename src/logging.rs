//! File logging for TUI sessions.
//!
//! The terminal owns stdout while the UI runs, so diagnostics go to
//! `<data dir>/xlate/xlate.log` instead.

use chrono::Local;
use lazy_static::lazy_static;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

lazy_static! {
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
}

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

/// Open the default log file and write a session marker.
pub fn init_logger() -> anyhow::Result<()> {
    init_logger_at(&get_log_path())
}

/// Open `path` as the session log.
pub fn init_logger_at(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut log_file = LOG_FILE.lock().unwrap_or_else(|e| e.into_inner());
    *log_file = Some(file);

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    if let Some(ref mut f) = *log_file {
        let _ = writeln!(f, "\n=== xlate session {} ===\n", timestamp);
    }

    Ok(())
}

/// Debug lines are dropped unless enabled.
pub fn set_debug_mode(enabled: bool) {
    DEBUG_ENABLED.store(enabled, Ordering::Relaxed);
}

fn get_log_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("xlate").join("xlate.log"),
        None => PathBuf::from("xlate.log"),
    }
}

/// Append one line. No-op until a logger has been initialised.
pub fn log(level: Level, message: &str) {
    if level == Level::Debug && !DEBUG_ENABLED.load(Ordering::Relaxed) {
        return;
    }

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let mut log_file = LOG_FILE.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(ref mut f) = *log_file {
        let _ = writeln!(f, "[{}] {}: {}", timestamp, level.label(), message);
        let _ = f.flush();
    }
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logging::log($crate::logging::Level::Info, &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logging::log($crate::logging::Level::Debug, &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logging::log($crate::logging::Level::Warn, &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logging::log($crate::logging::Level::Error, &format!($($arg)*));
    };
}

/// Log file location, for the startup message.
pub fn get_log_path_display() -> String {
    get_log_path().display().to_string()
}
