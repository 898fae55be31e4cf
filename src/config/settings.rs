//! User settings for cash-envelope
//!
//! Holds display preferences, the owner used when none is named on the
//! command line, the capacity given to new sub-accounts and the default log
//! filter.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::Money;

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used in output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Owner used when `--owner` is not given
    #[serde(default = "default_owner")]
    pub default_owner: String,

    /// Capacity given to sub-accounts of newly created accounts
    #[serde(default = "default_sub_account_capacity")]
    pub default_sub_account_capacity: Money,

    /// Default tracing filter (overridden by `RUST_LOG`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_owner() -> String {
    "default".to_string()
}

fn default_sub_account_capacity() -> Money {
    Money::from_cents(100_000)
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            default_owner: default_owner(),
            default_sub_account_capacity: default_sub_account_capacity(),
            log_level: default_log_level(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    fn validate(&self) -> Result<(), LedgerError> {
        if !self.default_sub_account_capacity.is_positive() {
            return Err(LedgerError::Config(format!(
                "default_sub_account_capacity must be positive, got {}",
                self.default_sub_account_capacity
            )));
        }
        if self.default_owner.trim().is_empty() {
            return Err(LedgerError::Config("default_owner cannot be empty".into()));
        }
        Ok(())
    }
}
