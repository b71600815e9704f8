// Author: Dustin Pilgrim
// License: MIT

use std::fmt::Arguments;
use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Local;
use once_cell::sync::Lazy;

const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024; // 5 MiB
const DEFAULT_KEEP_BACKUPS: u32 = 5;

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum LogLevel {
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl LogLevel {
    fn color(&self) -> &'static str {
        match self {
            LogLevel::Error => "\x1b[31m", // Red
            LogLevel::Warn => "\x1b[33m",  // Yellow
            LogLevel::Info => "\x1b[36m",  // Cyan
            LogLevel::Debug => "\x1b[90m", // Gray
        }
    }

    fn short(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERR",
            LogLevel::Warn => "WRN",
            LogLevel::Info => "INF",
            LogLevel::Debug => "DBG",
        }
    }
}

const RESET_COLOR: &str = "\x1b[0m";

pub struct Config {
    pub level: LogLevel,
    pub console: bool,
    pub use_colors: bool,
    pub file: Option<PathBuf>,
}

pub static GLOBAL_CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| {
    Mutex::new(Config {
        level: LogLevel::Info,
        console: false,
        use_colors: io::stderr().is_terminal(),
        file: None,
    })
});

fn config() -> MutexGuard<'static, Config> {
    GLOBAL_CONFIG.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Debug level plus console echo.
pub fn set_verbose(enabled: bool) {
    let mut cfg = config();
    cfg.level = if enabled { LogLevel::Debug } else { LogLevel::Info };
    cfg.console = enabled;
}

pub fn enable_file_output(path: &Path) {
    config().file = Some(path.to_path_buf());
}

pub fn log_message(level: LogLevel, prefix: &str, args: Arguments) {
    let cfg = config();

    if level > cfg.level {
        return;
    }

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let file_line = format!("[{}][{}][{}] {}", timestamp, level.short(), prefix, args);

    if let Some(path) = &cfg.file {
        if let Err(e) = write_raw_line(path, &file_line) {
            eprintln!("dwell: failed to write log: {e}");
        }
    }

    if cfg.console || level == LogLevel::Error {
        let console_line = if cfg.use_colors {
            format!("{}●{} [{}][{}] {}", level.color(), RESET_COLOR, timestamp, prefix, args)
        } else {
            file_line
        };
        eprintln!("{console_line}");
    }
}

#[macro_export]
macro_rules! dlog {
    ($level:expr, $prefix:expr, $($arg:tt)*) => {
        $crate::log::log_message($level, $prefix, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! dinfo {
    ($prefix:expr, $($arg:tt)*) => { $crate::dlog!($crate::log::LogLevel::Info, $prefix, $($arg)*) };
}

#[macro_export]
macro_rules! dwarn {
    ($prefix:expr, $($arg:tt)*) => { $crate::dlog!($crate::log::LogLevel::Warn, $prefix, $($arg)*) };
}

#[macro_export]
macro_rules! derror {
    ($prefix:expr, $($arg:tt)*) => { $crate::dlog!($crate::log::LogLevel::Error, $prefix, $($arg)*) };
}

#[macro_export]
macro_rules! ddebug {
    ($prefix:expr, $($arg:tt)*) => { $crate::dlog!($crate::log::LogLevel::Debug, $prefix, $($arg)*) };
}

/// `$XDG_CACHE_HOME/dwell/dwell.log`
pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("dwell")
        .join("dwell.log")
}

// ---------------- rotation ----------------

pub struct LogPolicy {
    pub max_bytes: u64,
    pub keep_backups: u32,
}

impl Default for LogPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            keep_backups: DEFAULT_KEEP_BACKUPS,
        }
    }
}

/// Ensures the log directory exists and rotates the file if needed.
/// Returns whether to insert a blank line before the next run header.
pub fn prepare_log_file(path: &Path, policy: LogPolicy) -> io::Result<bool> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    if meta.len() == 0 {
        return Ok(false);
    }

    if meta.len() >= policy.max_bytes {
        rotate(path, policy.keep_backups)?;
        return Ok(false);
    }

    Ok(true)
}

pub fn run_header() -> String {
    let pid = std::process::id();
    format!("==================== dwell daemon run start (pid={pid}) ====================")
}

pub fn write_raw_line(path: &Path, line: &str) -> io::Result<()> {
    let mut f = OpenOptions::new().create(true).append(true).open(path)?;
    f.write_all(line.as_bytes())?;
    f.write_all(b"\n")?;
    f.flush()
}

fn rotate(path: &Path, keep_backups: u32) -> io::Result<()> {
    if keep_backups == 0 {
        let _ = fs::remove_file(path);
        return Ok(());
    }

    for i in (1..keep_backups).rev() {
        let from = rotated_name(path, i);
        let to = rotated_name(path, i + 1);
        if from.exists() {
            let _ = fs::rename(from, to);
        }
    }

    fs::rename(path, rotated_name(path, 1))
}

fn rotated_name(base: &Path, n: u32) -> PathBuf {
    PathBuf::from(format!("{}.{}", base.display(), n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_needs_no_separator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("dwell.log");

        assert!(!prepare_log_file(&path, LogPolicy::default()).unwrap());
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn existing_content_needs_separator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dwell.log");
        write_raw_line(&path, "old run").unwrap();

        assert!(prepare_log_file(&path, LogPolicy::default()).unwrap());
    }

    #[test]
    fn oversized_log_is_rotated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dwell.log");
        fs::write(&path, "0123456789").unwrap();
        fs::write(rotated_name(&path, 1), "older").unwrap();

        let policy = LogPolicy {
            max_bytes: 5,
            keep_backups: 3,
        };
        assert!(!prepare_log_file(&path, policy).unwrap());

        assert!(!path.exists());
        assert_eq!(fs::read_to_string(rotated_name(&path, 1)).unwrap(), "0123456789");
        assert_eq!(fs::read_to_string(rotated_name(&path, 2)).unwrap(), "older");
    }

    #[test]
    fn run_header_mentions_pid() {
        assert!(run_header().contains(&std::process::id().to_string()));
    }
}
