//! Application configuration.
//!
//! Configuration is loaded from two sources and merged:
//! 1. Global config: `~/.config/llamachat/config.json` (or `config.jsonc`)
//! 2. Environment variable: `LLAMACHAT_CONFIG_CONTENT`
//!
//! JSONC (JSON with comments) is accepted in both.

use crate::error::ConfigError;
use llamachat_util::LogLevel;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable holding inline config content.
pub const CONFIG_CONTENT_ENV: &str = "LLAMACHAT_CONFIG_CONTENT";

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory backing the settings store.
    pub data_dir: Option<PathBuf>,

    /// Log level.
    pub log_level: Option<LogLevel>,
}

impl AppConfig {
    /// Merge another config into this one. Values in `other` win.
    pub fn merge(mut self, other: Self) -> Self {
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
        self
    }

    /// Load configuration from all sources.
    ///
    /// Returns the merged config and the files it was read from.
    pub async fn load() -> Result<(Self, Vec<PathBuf>), ConfigError> {
        let mut config = AppConfig::default();
        let mut sources = Vec::new();

        if let Some(global_dir) = llamachat_util::path::config_dir() {
            if let Some(path) = Self::find_in(&global_dir) {
                let loaded = Self::load_file(&path).await?;
                config = config.merge(loaded);
                sources.push(path);
            }
        }

        if let Ok(content) = std::env::var(CONFIG_CONTENT_ENV) {
            let loaded = Self::parse_jsonc(&content, "<env>")?;
            config = config.merge(loaded);
        }

        Ok((config, sources))
    }

    /// Find the config file in a directory.
    fn find_in(dir: &Path) -> Option<PathBuf> {
        ["config.jsonc", "config.json"]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Load configuration from a file.
    pub async fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse_jsonc(&content, &path.display().to_string())
    }

    /// Parse JSONC (JSON with comments).
    fn parse_jsonc(content: &str, source: &str) -> Result<Self, ConfigError> {
        let stripped = strip_comments(content);

        serde_json::from_str(&stripped).map_err(|e| ConfigError::InvalidJson {
            path: source.to_string(),
            message: e.to_string(),
        })
    }
}

/// Strip `//` and `/* */` comments outside of strings.
fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape_next = false;

    while let Some(c) = chars.next() {
        if escape_next {
            result.push(c);
            escape_next = false;
            continue;
        }

        if c == '\\' && in_string {
            result.push(c);
            escape_next = true;
            continue;
        }

        if c == '"' {
            in_string = !in_string;
            result.push(c);
            continue;
        }

        if in_string {
            result.push(c);
            continue;
        }

        if c == '/' {
            match chars.peek() {
                Some('/') => {
                    chars.next();
                    for c in chars.by_ref() {
                        if c == '\n' {
                            result.push('\n');
                            break;
                        }
                    }
                    continue;
                }
                Some('*') => {
                    chars.next();
                    let mut prev = ' ';
                    for c in chars.by_ref() {
                        if prev == '*' && c == '/' {
                            break;
                        }
                        // Keep line numbers stable for error messages
                        if c == '\n' {
                            result.push('\n');
                        }
                        prev = c;
                    }
                    continue;
                }
                _ => {}
            }
        }

        result.push(c);
    }

    result
}
