use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Stores user-configurable shell preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional directory for the data file and backups. Defaults to the base directory.
    pub data_dir: Option<PathBuf>,

    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default = "Config::default_page_size")]
    pub page_size: usize,
    #[serde(default = "Config::default_low_stock_preview")]
    pub low_stock_preview: usize,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            data_dir: None,
            backup_retention: Self::default_backup_retention(),
            page_size: Self::default_page_size(),
            low_stock_preview: Self::default_low_stock_preview(),
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 7] = [
        "locale",
        "currency",
        "data_dir",
        "backup_retention",
        "page_size",
        "low_stock_preview",
        "ui_color_enabled",
    ];

    pub fn default_locale() -> String {
        "fr-FR".into()
    }

    pub fn default_currency() -> String {
        "EUR".into()
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn default_page_size() -> usize {
        10
    }

    pub fn default_low_stock_preview() -> usize {
        10
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Directory holding the data file, falling back to `base`.
    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| base.to_path_buf())
    }

    /// Current value of `key` rendered for display.
    pub fn get_value(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "locale" => self.locale.clone(),
            "currency" => self.currency.clone(),
            "data_dir" => self
                .data_dir
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "(default)".into()),
            "backup_retention" => self.backup_retention.to_string(),
            "page_size" => self.page_size.to_string(),
            "low_stock_preview" => self.low_stock_preview.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Parses `value` and stores it under `key`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "locale" => self.locale = non_empty(key, value)?,
            "currency" => self.currency = non_empty(key, value)?.to_ascii_uppercase(),
            "data_dir" => {
                self.data_dir = match value {
                    "" | "default" | "none" => None,
                    path => Some(PathBuf::from(path)),
                }
            }
            "backup_retention" => self.backup_retention = positive(key, value)?,
            "page_size" => self.page_size = positive(key, value)?,
            "low_stock_preview" => self.low_stock_preview = positive(key, value)?,
            "ui_color_enabled" => self.ui_color_enabled = flag(key, value)?,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn non_empty(key: &str, value: &str) -> Result<String, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: key.into(),
            reason: "value must not be empty".into(),
        });
    }
    Ok(value.to_string())
}

fn positive(key: &str, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(ConfigError::InvalidValue {
            key: key.into(),
            reason: format!("expected a positive whole number, got `{value}`"),
        }),
    }
}

fn flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.into(),
            reason: format!("expected on/off, got `{value}`"),
        }),
    }
}
