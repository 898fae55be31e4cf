//! JSON export
//!
//! Exports one owner's complete ledger with schema versioning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    LedgerAccount, LedgerSubAccount, Money, Owner, OwnerId, RecurringExpense, TransactionGroup,
};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Everything the ledger holds for one owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// The owner, pending cash included
    pub owner: Owner,

    pub accounts: Vec<LedgerAccount>,

    pub sub_accounts: Vec<LedgerSubAccount>,

    pub expenses: Vec<RecurringExpense>,

    /// Posted transaction groups, oldest first
    pub transaction_groups: Vec<TransactionGroup>,

    pub metadata: ExportMetadata,
}

/// Totals recorded alongside the export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub account_count: usize,
    pub sub_account_count: usize,
    pub group_count: usize,
    /// Sum of logical balances
    pub logical_total: Money,
    /// Cash held in sub-accounts plus pending cash
    pub physical_total: Money,
}

impl LedgerExport {
    /// Build an export for one owner from the committed ledger
    pub fn for_owner(storage: &Storage, owner_id: OwnerId) -> LedgerResult<Self> {
        let data = storage.snapshot()?;
        let owner = data.owner(owner_id)?.clone();

        let accounts: Vec<LedgerAccount> =
            data.accounts_of(owner_id).into_iter().cloned().collect();
        let sub_accounts: Vec<LedgerSubAccount> = accounts
            .iter()
            .flat_map(|a| data.sub_accounts_of(a.id))
            .cloned()
            .collect();
        let expenses = data.expenses_of(owner_id).into_iter().cloned().collect();
        let mut transaction_groups: Vec<TransactionGroup> =
            data.groups_of(owner_id).into_iter().cloned().collect();
        transaction_groups.reverse();

        let metadata = ExportMetadata {
            account_count: accounts.len(),
            sub_account_count: sub_accounts.len(),
            group_count: transaction_groups.len(),
            logical_total: data.logical_total(owner_id),
            physical_total: data.physical_total(owner_id)?,
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            owner,
            accounts,
            sub_accounts,
            expenses,
            transaction_groups,
            metadata,
        })
    }

    /// Check the schema version and that every reference resolves
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let account_ids: HashSet<_> = self.accounts.iter().map(|a| a.id).collect();
        if !account_ids.contains(&self.owner.expenses_account_id) {
            return Err(format!(
                "Owner {} references unknown expenses account {}",
                self.owner.id, self.owner.expenses_account_id
            ));
        }
        for sub in &self.sub_accounts {
            if !account_ids.contains(&sub.account_id) {
                return Err(format!(
                    "Sub-account {} references unknown account {}",
                    sub.id, sub.account_id
                ));
            }
        }
        for entry in self.transaction_groups.iter().flat_map(|g| &g.entries) {
            if !account_ids.contains(&entry.account_id) {
                return Err(format!(
                    "Entry {} references unknown account {}",
                    entry.id, entry.account_id
                ));
            }
        }
        if self.metadata.logical_total != self.metadata.physical_total {
            return Err(format!(
                "Logical total {} does not match physical total {}",
                self.metadata.logical_total, self.metadata.physical_total
            ));
        }

        Ok(())
    }
}

/// Export one owner's ledger to JSON
pub fn export_json<W: Write>(
    storage: &Storage,
    owner_id: OwnerId,
    writer: &mut W,
    pretty: bool,
) -> LedgerResult<()> {
    let export = LedgerExport::for_owner(storage, owner_id)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(())
}

/// Read back a JSON export (for verification)
pub fn read_json_export(json_str: &str) -> LedgerResult<LedgerExport> {
    let export: LedgerExport =
        serde_json::from_str(json_str).map_err(|e| LedgerError::Export(e.to_string()))?;
    export.validate().map_err(LedgerError::Export)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{create_storage, owner_with_expense};
    use crate::services::DepositService;
    use std::collections::HashMap;

    fn funded(storage: &Storage) -> OwnerId {
        let owner_id = owner_with_expense(storage);
        let mut cash = HashMap::new();
        cash.insert("50", 2);
        DepositService::new(storage)
            .apply_deposit(owner_id, &cash)
            .unwrap();
        owner_id
    }

    #[test]
    fn test_export_for_owner() {
        let (_temp, storage) = create_storage();
        let owner_id = funded(&storage);

        let export = LedgerExport::for_owner(&storage, owner_id).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.accounts.len(), 4);
        assert_eq!(export.expenses.len(), 1);
        assert_eq!(export.metadata.group_count, 1);
        assert_eq!(export.metadata.logical_total, Money::from_cents(10_000));
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_json_read_back() {
        let (_temp, storage) = create_storage();
        let owner_id = funded(&storage);

        let mut output = Vec::new();
        export_json(&storage, owner_id, &mut output, true).unwrap();
        let imported = read_json_export(&String::from_utf8(output).unwrap()).unwrap();

        assert_eq!(imported.owner.name, "ana");
        assert_eq!(imported.owner.pending_snapshot().total(), Money::from_cents(10_000));
        assert_eq!(imported.transaction_groups[0].entries.len(), 4);
    }

    #[test]
    fn test_validate_rejects_dangling_reference() {
        let (_temp, storage) = create_storage();
        let owner_id = funded(&storage);

        let mut export = LedgerExport::for_owner(&storage, owner_id).unwrap();
        export.accounts.retain(|a| a.name != "Principal");

        assert!(export.validate().unwrap_err().contains("unknown account"));
    }
}
