//! Logging initialization.
//!
//! The settings panel owns the terminal, so interactive runs log to a file in
//! the platform log directory. One-shot commands log to stderr.

use std::path::PathBuf;

use llamachat_util::log::{self, LogConfig, LogLevel};

/// Initialize logging based on verbosity and mode.
///
/// `configured` is the level from the config file. Returns the log file path
/// if logging to file.
pub fn init_logging(verbose: bool, interactive: bool, configured: Option<LogLevel>) -> Option<PathBuf> {
    if interactive {
        let level = if verbose {
            LogLevel::Debug
        } else {
            configured.unwrap_or_default()
        };
        return log::init(LogConfig {
            level,
            file: Some(log::default_log_path()),
            ..Default::default()
        });
    }

    // Keep stdout output of one-shot commands clean unless asked.
    let level = if verbose {
        LogLevel::Debug
    } else {
        configured.unwrap_or(LogLevel::Warn)
    };
    log::init(LogConfig {
        print: true,
        level,
        include_location: verbose,
        file: None,
    })
}
