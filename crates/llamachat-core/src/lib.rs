//! Core settings model for llamachat.
//!
//! - [`settings`] - the five persisted preference fields, their defaults, and
//!   the edit buffer that loads and saves them through a [`Storage`]
//! - [`config`] - application configuration (storage location, log level)
//! - [`error`] - error types
//!
//! [`Storage`]: llamachat_storage::Storage

pub mod config;
pub mod error;
pub mod settings;

pub use config::AppConfig;
pub use error::{ConfigError, CoreResult, FieldWriteError, SaveError, SettingsError};
pub use settings::{
    Mode, SettingKey, SettingsBuffer, SettingsRecord, DEFAULT_MODE, DEFAULT_MODEL, MODEL_OPTIONS,
    SETTINGS_PREFIX,
};
