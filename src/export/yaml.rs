//! YAML export
//!
//! Same document as the JSON export, written for people to read.

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::export::json::LedgerExport;
use crate::models::OwnerId;
use crate::storage::Storage;

/// Export one owner's ledger to YAML
pub fn export_yaml<W: Write>(
    storage: &Storage,
    owner_id: OwnerId,
    writer: &mut W,
) -> LedgerResult<()> {
    let export = LedgerExport::for_owner(storage, owner_id)?;
    let io_err = |e: std::io::Error| LedgerError::Export(e.to_string());

    writeln!(writer, "# cash-envelope ledger export for {}", export.owner.name).map_err(io_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(io_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(io_err)?;
    writeln!(writer).map_err(io_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(())
}

/// Read back a YAML export
pub fn read_yaml_export(yaml_str: &str) -> LedgerResult<LedgerExport> {
    let export: LedgerExport =
        serde_yaml::from_str(yaml_str).map_err(|e| LedgerError::Export(e.to_string()))?;
    export.validate().map_err(LedgerError::Export)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::services::test_support::{create_storage, standard_owner};
    use crate::services::DepositService;
    use std::collections::HashMap;

    #[test]
    fn test_yaml_export() {
        let (_temp, storage) = create_storage();
        let owner_id = standard_owner(&storage);
        let mut cash = HashMap::new();
        cash.insert("20", 1);
        cash.insert("0.50", 3);
        DepositService::new(&storage)
            .apply_deposit(owner_id, &cash)
            .unwrap();

        let mut output = Vec::new();
        export_yaml(&storage, owner_id, &mut output).unwrap();
        let yaml = String::from_utf8(output).unwrap();

        assert!(yaml.starts_with("# cash-envelope ledger export for ana"));
        assert!(yaml.contains("schema_version"));

        let imported = read_yaml_export(&yaml).unwrap();
        assert_eq!(imported.metadata.logical_total, Money::from_cents(2_150));
        assert_eq!(imported.sub_accounts.len(), 3);
    }
}
