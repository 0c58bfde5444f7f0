//! User settings for the expense tracker
//!
//! Manages user preferences: currency display, the spending alert toggle,
//! log verbosity and the bank import parameters.

use serde::{Deserialize, Serialize};

use super::paths::ExpensePaths;
use crate::error::ExpenseError;

/// Monobank import settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonobankSettings {
    /// API host, without trailing slash
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// How far back a statement request reaches
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Account types that are never imported (business accounts)
    #[serde(default = "default_excluded_account_types")]
    pub excluded_account_types: Vec<String>,
}

fn default_api_url() -> String {
    "https://api.monobank.ua".to_string()
}

fn default_lookback_days() -> u32 {
    30
}

fn default_excluded_account_types() -> Vec<String> {
    vec!["fop".to_string()]
}

impl Default for MonobankSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            lookback_days: default_lookback_days(),
            excluded_account_types: default_excluded_account_types(),
        }
    }
}

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when formatting amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Whether the high-spending alert is delivered
    #[serde(default = "default_spending_alerts")]
    pub spending_alerts: bool,

    /// Default log level for the `expense_tracker` target
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub monobank: MonobankSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₴".to_string()
}

fn default_spending_alerts() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            spending_alerts: default_spending_alerts(),
            log_level: default_log_level(),
            monobank: MonobankSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &ExpensePaths) -> Result<Self, ExpenseError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                ExpenseError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ExpenseError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ExpensePaths) -> Result<(), ExpenseError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            ExpenseError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            ExpenseError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.spending_alerts);
        assert_eq!(settings.currency_symbol, "₴");
        assert_eq!(settings.monobank.lookback_days, 30);
        assert_eq!(settings.monobank.excluded_account_types, vec!["fop"]);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.spending_alerts = false;
        settings.monobank.api_url = "http://127.0.0.1:9000".into();
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert!(!loaded.spending_alerts);
        assert_eq!(loaded.monobank.api_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "$"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "$");
        assert!(settings.spending_alerts);
        assert_eq!(settings.monobank, MonobankSettings::default());
    }

    #[test]
    fn test_reminder_toggles_are_ignored() {
        let settings: Settings = serde_json::from_str(
            r#"{"spending_alerts": false, "daily_reminders": true, "weekly_summary": true}"#,
        )
        .unwrap();
        assert!(!settings.spending_alerts);

        let saved = serde_json::to_value(&settings).unwrap();
        assert!(saved.get("daily_reminders").is_none());
        assert!(saved.get("weekly_summary").is_none());
    }

    #[test]
    fn test_corrupt_settings_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{ not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, ExpenseError::Config(_)));
    }
}
