//! Storage initialization
//!
//! Handles first-run setup: directories, settings file, an empty ledger
//! document and the default owner.

use tracing::info;

use crate::config::{paths::LedgerPaths, settings::Settings};
use crate::error::LedgerError;

use super::Storage;

/// Initialize storage for a fresh installation
///
/// Writes the settings file and creates the default owner named in the
/// settings if it does not exist yet. Existing data is never overwritten.
pub fn initialize_storage(paths: &LedgerPaths, settings: &Settings) -> Result<(), LedgerError> {
    paths.ensure_directories()?;

    if !paths.settings_file().exists() {
        settings.save(paths)?;
    }

    let storage = Storage::open(paths.clone())?;
    let mut tx = storage.begin()?;
    if tx.owner_by_name(&settings.default_owner).is_none() {
        tx.create_owner(&settings.default_owner, settings.default_sub_account_capacity)?;
        info!(owner = %settings.default_owner, "created default owner");
    }
    tx.commit()
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.settings_file().exists() || !paths.ledger_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));

        initialize_storage(&paths, &Settings::default()).unwrap();

        assert!(!needs_initialization(&paths));
        assert!(paths.ledger_file().exists());
        assert!(paths.settings_file().exists());

        let storage = Storage::open(paths).unwrap();
        let data = storage.snapshot().unwrap();
        assert!(data.owner_by_name("default").is_some());
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths, &Settings::default()).unwrap();

        let storage = Storage::open(paths.clone()).unwrap();
        let mut tx = storage.begin().unwrap();
        tx.create_owner("ana", Money::from_cents(5_000)).unwrap();
        tx.commit().unwrap();

        initialize_storage(&paths, &Settings::default()).unwrap();

        let storage = Storage::open(paths).unwrap();
        assert_eq!(storage.snapshot().unwrap().owners().len(), 2);
    }
}
