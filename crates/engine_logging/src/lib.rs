#![deny(missing_docs)]
//! Shared logging utilities for the migration workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! the run logger (console plus a timestamped file per run) and a minimal
//! test initializer for the global logger.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// File name of the detailed log for a run started at `started`.
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!("migration_{}.log", started.format("%Y%m%d_%H%M%S"))
}

/// Initializes the run logger: terminal output at `console_level` and a
/// debug-level file under `logs_dir`.
///
/// Returns the log file path, or `None` when the file could not be created
/// (logging then continues on the terminal only).
pub fn initialize_run_logger(logs_dir: &Path, console_level: LevelFilter) -> Option<PathBuf> {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        console_level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    let log_path = logs_dir.join(log_file_name(Local::now()));
    let file_logger = create_file_logger(&log_path, config);
    let created = file_logger.is_some();
    loggers.extend(file_logger.map(|l| l as Box<dyn SharedLogger>));

    let _ = CombinedLogger::init(loggers);
    created.then_some(log_path)
}

/// Terminal-only logger for commands that do not produce a run log.
pub fn initialize_console(level: LevelFilter) {
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        build_config(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(log_path: &Path, config: Config) -> Option<Box<WriteLogger<File>>> {
    if let Some(parent) = log_path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory {:?}: {}", parent, err);
            return None;
        }
    }
    match File::create(log_path) {
        Ok(file) => Some(WriteLogger::new(LevelFilter::Debug, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
