//! Error types for the core crate.

use crate::settings::SettingKey;
use llamachat_storage::StorageError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, SettingsError>;

/// Settings errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A field name that doesn't match any setting.
    #[error("unknown setting: {0} (expected one of: mode, model, systemPrompt, apiToken, dbConnectionString)")]
    UnknownField(String),

    /// Storage error outside of a save.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// A single failed field write.
#[derive(Debug, Error)]
#[error("{key}: {source}")]
pub struct FieldWriteError {
    /// The field whose write failed.
    pub key: SettingKey,
    /// The underlying storage failure.
    #[source]
    pub source: StorageError,
}

/// Save attempted every field and at least one write failed.
#[derive(Debug, Error)]
#[error("failed to save {}", describe(.failures))]
pub struct SaveError {
    /// Failed writes, in save order.
    pub failures: Vec<FieldWriteError>,
}

impl SaveError {
    /// Keys whose writes failed.
    pub fn failed_keys(&self) -> Vec<SettingKey> {
        self.failures.iter().map(|f| f.key).collect()
    }
}

fn describe(failures: &[FieldWriteError]) -> String {
    failures
        .iter()
        .map(|f| f.key.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid JSON/JSONC syntax.
    #[error("invalid config at {path}: {message}")]
    InvalidJson { path: String, message: String },

    /// IO error while reading a config file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_failure() -> StorageError {
        StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ))
    }

    #[test]
    fn save_error_lists_failed_fields() {
        let err = SaveError {
            failures: vec![
                FieldWriteError {
                    key: SettingKey::ApiToken,
                    source: io_failure(),
                },
                FieldWriteError {
                    key: SettingKey::Model,
                    source: io_failure(),
                },
            ],
        };

        assert_eq!(err.to_string(), "failed to save Groq API Token, Model");
        assert_eq!(
            err.failed_keys(),
            vec![SettingKey::ApiToken, SettingKey::Model]
        );
    }

    #[test]
    fn field_write_error_names_storage_key() {
        let err = FieldWriteError {
            key: SettingKey::DbConnectionString,
            source: io_failure(),
        };
        assert!(err.to_string().starts_with("dbConnectionString: IO error"));
    }

    #[test]
    fn unknown_field_mentions_valid_names() {
        let err = SettingsError::UnknownField("theme".to_string());
        assert!(err.to_string().contains("unknown setting: theme"));
        assert!(err.to_string().contains("systemPrompt"));
    }

    #[test]
    fn config_error_formats_path() {
        let err = ConfigError::InvalidJson {
            path: "/tmp/config.json".to_string(),
            message: "expected value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config at /tmp/config.json: expected value"
        );
    }
}
