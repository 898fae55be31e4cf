//! Path management for cash-envelope
//!
//! ## Path Resolution Order
//!
//! 1. `CASH_ENVELOPE_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory (`$XDG_CONFIG_HOME`,
//!    `~/Library/Application Support`, `%APPDATA%`) joined with
//!    `cash-envelope`

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::LedgerError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "CASH_ENVELOPE_DATA_DIR";

const APP_DIR_NAME: &str = "cash-envelope";

/// Manages all paths used by cash-envelope
#[derive(Debug, Clone)]
pub struct LedgerPaths {
    /// Base directory for all data
    base_dir: PathBuf,
}

impl LedgerPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home/config directory can be determined.
    pub fn new() -> Result<Self, LedgerError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Default export directory (`<base>/exports/`)
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Append-only audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// The ledger document (all tables)
    pub fn ledger_file(&self) -> PathBuf {
        self.data_dir().join("ledger.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), LedgerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| LedgerError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.export_dir())
            .map_err(|e| LedgerError::Io(format!("Failed to create export directory: {}", e)))?;

        Ok(())
    }

    /// Check if the ledger has been initialized (settings file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, LedgerError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| LedgerError::Config("Could not determine a home directory".into()))?;
    Ok(dirs.config_dir().join(APP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.export_dir(), temp_dir.path().join("exports"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(paths.export_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.ledger_file(),
            temp_dir.path().join("data").join("ledger.json")
        );
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
    }
}
