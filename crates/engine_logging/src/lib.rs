#![deny(missing_docs)]
//! Shared logging utilities for the extractor workspace.
//!
//! Provides the `engine_*` macros used by every crate, the process-wide
//! logger initialization for the server binary, and a test initializer.

use std::fs::File;
use std::path::PathBuf;

#[doc(hidden)]
pub use log;
pub use log::LevelFilter;

use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        $crate::log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
    }};
}

/// Where log records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Terminal only (stderr for warnings and errors, stdout otherwise).
    Terminal,
    /// The given file only, truncated on start.
    File(PathBuf),
    /// Terminal and the given file.
    Both(PathBuf),
}

/// Logger configuration for a process.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Most verbose level that is emitted.
    pub level: LevelFilter,
    /// Output sink(s).
    pub destination: LogDestination,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            destination: LogDestination::Terminal,
        }
    }
}

/// Installs the global logger.
///
/// A file that cannot be created is reported on stderr and skipped; the
/// terminal logger, if requested, still comes up. Calling this twice is a no-op.
pub fn initialize(settings: LogSettings) {
    let level = settings.level;
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match settings.destination {
        LogDestination::Terminal => vec![terminal_logger(level, config)],
        LogDestination::File(path) => file_logger(level, config, path).into_iter().collect(),
        LogDestination::Both(path) => {
            let mut loggers = vec![terminal_logger(level, config.clone())];
            loggers.extend(file_logger(level, config, path));
            loggers
        }
    };

    if loggers.is_empty() {
        return;
    }
    let _ = CombinedLogger::init(loggers);
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
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

fn terminal_logger(level: LevelFilter, config: Config) -> Box<dyn SharedLogger> {
    TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
}

fn file_logger(level: LevelFilter, config: Config, path: PathBuf) -> Option<Box<dyn SharedLogger>> {
    match File::create(&path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
