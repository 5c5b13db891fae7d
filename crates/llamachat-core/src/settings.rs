//! Persisted user preferences.
//!
//! Five flat string fields live under the `settings/` key prefix of a
//! [`Storage`]. [`SettingsRecord`] is a complete set of values with defaults
//! filled in; [`SettingsBuffer`] is the per-session edit buffer that loads a
//! record once, takes field-level edits, and writes every field back on save.

use std::fmt;
use std::str::FromStr;

use llamachat_storage::Storage;
use tracing::{debug, info, warn};

use crate::error::{CoreResult, FieldWriteError, SaveError, SettingsError};

/// Key prefix under which all settings are stored.
pub const SETTINGS_PREFIX: &str = "settings";

/// Display mode used when none is stored.
pub const DEFAULT_MODE: &str = "dark";

/// Model used when none is stored.
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Model choices offered by the settings panel: `(value, label)`.
///
/// The empty value is the "no selection" placeholder.
pub const MODEL_OPTIONS: &[(&str, &str)] = &[
    ("", "Select a model"),
    ("llama3-8b-8192", "Llama3-8B-8192"),
    ("llama3-70b-8192", "Llama3-70B-8192"),
];

/// One persisted settings field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Mode,
    Model,
    SystemPrompt,
    ApiToken,
    DbConnectionString,
}

impl SettingKey {
    /// All fields, in load and save order.
    pub const ALL: [SettingKey; 5] = [
        SettingKey::Mode,
        SettingKey::Model,
        SettingKey::SystemPrompt,
        SettingKey::ApiToken,
        SettingKey::DbConnectionString,
    ];

    /// Name of the field in storage.
    pub fn storage_name(&self) -> &'static str {
        match self {
            SettingKey::Mode => "mode",
            SettingKey::Model => "model",
            SettingKey::SystemPrompt => "systemPrompt",
            SettingKey::ApiToken => "apiToken",
            SettingKey::DbConnectionString => "dbConnectionString",
        }
    }

    /// Full storage key path.
    pub fn storage_key(&self) -> [&'static str; 2] {
        [SETTINGS_PREFIX, self.storage_name()]
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SettingKey::Mode => "Mode",
            SettingKey::Model => "Model",
            SettingKey::SystemPrompt => "System Prompt",
            SettingKey::ApiToken => "Groq API Token",
            SettingKey::DbConnectionString => "MongoDB Connection String",
        }
    }

    /// Value used when nothing is stored.
    pub fn default_value(&self) -> &'static str {
        match self {
            SettingKey::Mode => DEFAULT_MODE,
            SettingKey::Model => DEFAULT_MODEL,
            SettingKey::SystemPrompt | SettingKey::ApiToken | SettingKey::DbConnectionString => "",
        }
    }

    /// Whether the value is a credential that should be masked on screen.
    pub fn is_secret(&self) -> bool {
        matches!(self, SettingKey::ApiToken | SettingKey::DbConnectionString)
    }

    /// Parse a field name. Accepts the storage name and snake/kebab-case forms.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "mode" => Some(SettingKey::Mode),
            "model" => Some(SettingKey::Model),
            "systemprompt" => Some(SettingKey::SystemPrompt),
            "apitoken" => Some(SettingKey::ApiToken),
            "dbconnectionstring" => Some(SettingKey::DbConnectionString),
            _ => None,
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_name())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| SettingsError::UnknownField(s.to_string()))
    }
}

/// Display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Light,
    #[default]
    Dark,
}

impl Mode {
    /// All modes, in the order the panel offers them.
    pub fn all() -> &'static [Mode] {
        &[Mode::Light, Mode::Dark]
    }

    /// Stored value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Light => "light",
            Mode::Dark => "dark",
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Light => "Light",
            Mode::Dark => "Dark",
        }
    }

    /// Parse a stored value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Mode::Light),
            "dark" => Some(Mode::Dark),
            _ => None,
        }
    }
}

/// A complete set of settings values.
///
/// Values are kept verbatim: a stored mode outside `light`/`dark` or a model
/// outside [`MODEL_OPTIONS`] is preserved as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsRecord {
    pub mode: String,
    pub model: String,
    pub system_prompt: String,
    pub api_token: String,
    pub db_connection_string: String,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            mode: DEFAULT_MODE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: String::new(),
            api_token: String::new(),
            db_connection_string: String::new(),
        }
    }
}

impl SettingsRecord {
    /// Read all five fields from storage.
    ///
    /// A missing or empty value falls back to the field default. A value that
    /// can't be read is logged and also falls back to the default.
    pub fn load<S: Storage + ?Sized>(store: &S) -> Self {
        let mut record = Self::default();
        for key in SettingKey::ALL {
            match store.read::<String>(&key.storage_key()) {
                Ok(Some(value)) if !value.is_empty() => record.set(key, value),
                Ok(_) => debug!(field = %key, "Setting not stored, using default"),
                Err(e) => warn!(field = %key, error = %e, "Failed to read setting, using default"),
            }
        }
        record
    }

    /// Get a field value.
    pub fn get(&self, key: SettingKey) -> &str {
        match key {
            SettingKey::Mode => &self.mode,
            SettingKey::Model => &self.model,
            SettingKey::SystemPrompt => &self.system_prompt,
            SettingKey::ApiToken => &self.api_token,
            SettingKey::DbConnectionString => &self.db_connection_string,
        }
    }

    /// Replace a field value.
    pub fn set(&mut self, key: SettingKey, value: impl Into<String>) {
        let value = value.into();
        match key {
            SettingKey::Mode => self.mode = value,
            SettingKey::Model => self.model = value,
            SettingKey::SystemPrompt => self.system_prompt = value,
            SettingKey::ApiToken => self.api_token = value,
            SettingKey::DbConnectionString => self.db_connection_string = value,
        }
    }

    /// The mode, if it is a known one.
    pub fn parsed_mode(&self) -> Option<Mode> {
        Mode::parse(&self.mode)
    }

    /// Write all five fields to storage.
    ///
    /// Every field is written even if an earlier write fails; failures are
    /// collected into the returned error.
    pub fn save<S: Storage + ?Sized>(&self, store: &S) -> Result<(), SaveError> {
        let mut failures = Vec::new();
        for key in SettingKey::ALL {
            if let Err(source) = store.write(&key.storage_key(), self.get(key)) {
                warn!(field = %key, error = %source, "Failed to save setting");
                failures.push(FieldWriteError { key, source });
            }
        }

        if failures.is_empty() {
            info!("Saved settings");
            Ok(())
        } else {
            Err(SaveError { failures })
        }
    }

    /// Remove all five fields from storage.
    pub fn clear_stored<S: Storage + ?Sized>(store: &S) -> CoreResult<()> {
        for key in SettingKey::ALL {
            store.remove(&key.storage_key())?;
        }
        info!("Cleared stored settings");
        Ok(())
    }
}

/// Per-session edit buffer for the settings panel.
///
/// Holds the values loaded at mount and the current edited values. Edits
/// never touch storage; only [`SettingsBuffer::save`] does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsBuffer {
    loaded: SettingsRecord,
    current: SettingsRecord,
}

impl SettingsBuffer {
    /// Load the buffer from storage.
    pub fn load<S: Storage + ?Sized>(store: &S) -> Self {
        Self::from_record(SettingsRecord::load(store))
    }

    /// Create a buffer from an existing record.
    pub fn from_record(record: SettingsRecord) -> Self {
        Self {
            loaded: record.clone(),
            current: record,
        }
    }

    /// Current edited values.
    pub fn record(&self) -> &SettingsRecord {
        &self.current
    }

    /// Current value of a field.
    pub fn get(&self, key: SettingKey) -> &str {
        self.current.get(key)
    }

    /// Value of a field as loaded at mount.
    pub fn loaded(&self, key: SettingKey) -> &str {
        self.loaded.get(key)
    }

    /// Replace a field value verbatim.
    pub fn set(&mut self, key: SettingKey, value: impl Into<String>) {
        self.current.set(key, value);
    }

    pub fn set_mode(&mut self, value: impl Into<String>) {
        self.set(SettingKey::Mode, value);
    }

    pub fn set_model(&mut self, value: impl Into<String>) {
        self.set(SettingKey::Model, value);
    }

    pub fn set_system_prompt(&mut self, value: impl Into<String>) {
        self.set(SettingKey::SystemPrompt, value);
    }

    pub fn set_api_token(&mut self, value: impl Into<String>) {
        self.set(SettingKey::ApiToken, value);
    }

    pub fn set_db_connection_string(&mut self, value: impl Into<String>) {
        self.set(SettingKey::DbConnectionString, value);
    }

    /// Whether a field differs from its loaded value.
    pub fn is_dirty(&self, key: SettingKey) -> bool {
        self.current.get(key) != self.loaded.get(key)
    }

    /// Whether any field differs from its loaded value.
    pub fn has_changes(&self) -> bool {
        self.current != self.loaded
    }

    /// Restore a field to its loaded value.
    pub fn reset(&mut self, key: SettingKey) {
        let original = self.loaded.get(key).to_string();
        self.current.set(key, original);
    }

    /// Write every field to storage.
    ///
    /// All five writes are issued on every call, changed or not.
    pub fn save<S: Storage + ?Sized>(&self, store: &S) -> Result<(), SaveError> {
        self.current.save(store)
    }
}
