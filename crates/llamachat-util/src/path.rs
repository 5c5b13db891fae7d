//! Path utilities.
//!
//! Platform directories used by llamachat for configuration, stored settings
//! and log files.

use std::path::PathBuf;

const APP_DIR: &str = "llamachat";

/// Get the llamachat configuration directory.
///
/// On Unix systems, prefers `~/.config/llamachat` when it already exists,
/// then falls back to the platform config directory.
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(unix)]
    {
        if let Some(home) = dirs::home_dir() {
            let xdg_config = home.join(".config").join(APP_DIR);
            if xdg_config.exists() {
                return Some(xdg_config);
            }
        }
    }

    dirs::config_dir().map(|p| p.join(APP_DIR))
}

/// Get the llamachat data directory.
///
/// This follows XDG conventions:
/// - `$XDG_DATA_HOME/llamachat` if set
/// - `~/.local/share/llamachat` otherwise
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join(APP_DIR))
}

/// Get the directory backing the settings store.
pub fn storage_dir() -> Option<PathBuf> {
    data_dir().map(|p| p.join("data"))
}

/// Get the log directory path.
pub fn log_dir() -> PathBuf {
    // macOS: ~/Library/Logs/llamachat
    // Linux: ~/.local/state/llamachat/logs
    // Windows: %LOCALAPPDATA%/llamachat/logs

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = dirs::home_dir() {
            return home.join("Library/Logs").join(APP_DIR);
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(state_dir) = dirs::state_dir() {
            return state_dir.join(APP_DIR).join("logs");
        }
        if let Some(home) = dirs::home_dir() {
            return home.join(".local/state").join(APP_DIR).join("logs");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(local_app) = dirs::data_local_dir() {
            return local_app.join(APP_DIR).join("logs");
        }
    }

    PathBuf::from(".llamachat/logs")
}
