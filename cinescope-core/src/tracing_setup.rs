//! Tracing setup for Cinescope
//!
//! Provides dual output: console logs (user-controlled level) and full debug logs to disk.
//! The interactive terminal stays readable while the log file keeps every
//! request, debounce emission and discarded response.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Name of the per-run debug log inside the logs directory.
pub const LOG_FILE_NAME: &str = "cinescope-last-run.log";

/// Initialize tracing with dual output: console (user level) + file (full debug)
///
/// # Arguments
/// * `console_level` - Log level for console output (what user sees)
/// * `logs_dir` - Directory to write debug logs (defaults to "./logs")
///
/// # File Output
/// Writes complete debug logs to `logs/cinescope-last-run.log`, overwriting previous run.
///
/// # Errors
///
/// - `Box<dyn std::error::Error>` - If logs directory cannot be created, the log file cannot be
///   opened for writing, or a global subscriber is already installed
pub fn init_tracing(
    console_level: Level,
    logs_dir: Option<&Path>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let logs_path = logs_dir.unwrap_or_else(|| Path::new("logs"));

    create_dir_all(logs_path)?;

    let log_file_path = logs_path.join(LOG_FILE_NAME);
    let log_file = File::create(&log_file_path)?;

    // Console layer - respects user's chosen log level
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.to_string()));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_filter(console_filter);

    // File layer - always captures everything at TRACE level for debugging
    let file_filter = EnvFilter::new("trace");

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(log_file)
        .with_filter(file_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!(
        "Tracing initialized: console={}, debug_file={}",
        console_level,
        log_file_path.display()
    );

    Ok(log_file_path)
}

/// CLI log levels for user control
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliLogLevel {
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Informational, warning, and error messages
    Info,
    /// Debug, informational, warning, and error messages
    Debug,
    /// All messages including detailed tracing
    Trace,
}

impl CliLogLevel {
    /// Converts CLI log level to tracing Level enum.
    ///
    /// # Examples
    /// ```
    /// use cinescope_core::tracing_setup::CliLogLevel;
    ///
    /// let level = CliLogLevel::Info.as_tracing_level();
    /// assert_eq!(level, tracing::Level::INFO);
    /// ```
    pub fn as_tracing_level(self) -> Level {
        match self {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}

impl std::fmt::Display for CliLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliLogLevel::Error => write!(f, "error"),
            CliLogLevel::Warn => write!(f, "warn"),
            CliLogLevel::Info => write!(f, "info"),
            CliLogLevel::Debug => write!(f, "debug"),
            CliLogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        use clap::ValueEnum;

        assert_eq!(CliLogLevel::from_str("WARN", true), Ok(CliLogLevel::Warn));
        assert!(CliLogLevel::from_str("loud", true).is_err());
        // Display feeds clap's default value and must round-trip
        assert_eq!(CliLogLevel::Debug.to_string(), "debug");
        assert_eq!(
            CliLogLevel::from_str(&CliLogLevel::Trace.to_string(), false),
            Ok(CliLogLevel::Trace)
        );
    }

    #[test]
    fn test_init_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("nested");

        let path = init_tracing(Level::WARN, Some(&logs)).unwrap();

        assert_eq!(path, logs.join(LOG_FILE_NAME));
        assert!(path.exists());
    }
}
