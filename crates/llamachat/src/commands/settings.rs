//! Non-interactive settings commands.

use std::path::PathBuf;

use anyhow::{bail, Context};
use llamachat_core::{AppConfig, Mode, SettingKey, SettingsRecord};
use llamachat_storage::{JsonStorage, Storage};
use tracing::info;

/// Open the JSON store.
///
/// The location is, in order of preference: `--data-dir`, the config file's
/// `data_dir`, then the platform data directory.
pub fn open_storage(data_dir: Option<PathBuf>, config: &AppConfig) -> anyhow::Result<JsonStorage> {
    match data_dir.or_else(|| config.data_dir.clone()) {
        Some(path) => Ok(JsonStorage::new(path)),
        None => JsonStorage::default_location()
            .context("Could not determine a data directory; pass --data-dir"),
    }
}

/// Mask a secret for display.
pub fn mask(value: &str) -> String {
    let count = value.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = value.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat((count - 4).min(12)), tail)
}

fn shown(key: SettingKey, value: &str, reveal: bool) -> String {
    if value.is_empty() {
        "(not set)".to_string()
    } else if key.is_secret() && !reveal {
        mask(value)
    } else {
        value.to_string()
    }
}

/// Format a settings record as aligned `name  value` lines.
pub fn format_settings(record: &SettingsRecord, reveal: bool) -> String {
    let width = SettingKey::ALL
        .iter()
        .map(|k| k.storage_name().len())
        .max()
        .unwrap_or(0);

    SettingKey::ALL
        .iter()
        .map(|key| {
            format!(
                "{:<width$}  {}",
                key.storage_name(),
                shown(*key, record.get(*key), reveal),
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a settings record as a JSON object keyed by storage name.
pub fn settings_json(record: &SettingsRecord, reveal: bool) -> serde_json::Value {
    let map = SettingKey::ALL
        .iter()
        .map(|key| {
            let value = record.get(*key);
            let value = if key.is_secret() && !reveal && !value.is_empty() {
                mask(value)
            } else {
                value.to_string()
            };
            (key.storage_name().to_string(), serde_json::Value::String(value))
        })
        .collect();
    serde_json::Value::Object(map)
}

/// Print the effective settings.
pub fn show_settings<S: Storage>(store: &S, reveal: bool, json: bool) -> anyhow::Result<()> {
    let record = SettingsRecord::load(store);

    if json {
        println!("{}", serde_json::to_string_pretty(&settings_json(&record, reveal))?);
    } else {
        println!("{}", format_settings(&record, reveal));
    }

    Ok(())
}

/// Store one setting.
pub fn set_setting<S: Storage>(store: &S, field: &str, value: &str) -> anyhow::Result<SettingKey> {
    let key: SettingKey = field.parse()?;

    if key == SettingKey::Mode && Mode::parse(value).is_none() {
        bail!("Invalid mode '{value}' (expected 'light' or 'dark')");
    }

    store
        .write(&key.storage_key(), value)
        .with_context(|| format!("Failed to save {}", key.label()))?;
    info!(field = %key, "Saved setting");

    Ok(key)
}

/// Remove every stored setting.
pub fn reset_settings<S: Storage>(store: &S) -> anyhow::Result<()> {
    SettingsRecord::clear_stored(store).context("Failed to reset settings")?;
    Ok(())
}
