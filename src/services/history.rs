//! Transaction history

use crate::audit::AuditEntry;
use crate::error::LedgerResult;
use crate::models::{OwnerId, TransactionGroup};
use crate::storage::Storage;

/// Read-only view over posted transaction groups
pub struct HistoryService<'a> {
    storage: &'a Storage,
}

impl<'a> HistoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The owner's most recent groups, newest first
    pub fn recent(&self, owner_id: OwnerId, limit: usize) -> LedgerResult<Vec<TransactionGroup>> {
        let data = self.storage.snapshot()?;
        data.owner(owner_id)?;
        Ok(data
            .groups_of(owner_id)
            .into_iter()
            .take(limit)
            .cloned()
            .collect())
    }

    /// Every group of the owner, newest first
    pub fn all(&self, owner_id: OwnerId) -> LedgerResult<Vec<TransactionGroup>> {
        self.recent(owner_id, usize::MAX)
    }

    /// The last `limit` audit log entries of the whole store, oldest first
    pub fn audit_trail(&self, limit: usize) -> LedgerResult<Vec<AuditEntry>> {
        self.storage.audit().read_recent(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::EntityType;
    use crate::models::GroupKind;
    use crate::services::test_support::{create_storage, standard_owner};
    use crate::services::{DepositService, WithdrawalService};
    use std::collections::HashMap;

    #[test]
    fn test_recent_newest_first() {
        let (_temp, storage) = create_storage();
        let owner_id = standard_owner(&storage);

        let mut deposit = HashMap::new();
        deposit.insert("20", 5);
        DepositService::new(&storage)
            .apply_deposit(owner_id, &deposit)
            .unwrap();

        let mut withdrawal = HashMap::new();
        withdrawal.insert("20", 1);
        WithdrawalService::new(&storage)
            .withdraw(owner_id, "Principal", &withdrawal, None)
            .unwrap();

        let history = HistoryService::new(&storage);
        let groups = history.recent(owner_id, 10).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].kind, GroupKind::Withdrawal);
        assert_eq!(groups[1].kind, GroupKind::Deposit);

        assert_eq!(history.recent(owner_id, 1).unwrap().len(), 1);
        assert!(history.recent(OwnerId::new(), 1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_audit_trail_ends_with_latest_posting() {
        let (_temp, storage) = create_storage();
        let owner_id = standard_owner(&storage);

        let mut deposit = HashMap::new();
        deposit.insert("20", 5);
        DepositService::new(&storage)
            .apply_deposit(owner_id, &deposit)
            .unwrap();

        let trail = HistoryService::new(&storage).audit_trail(2).unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].entity_type, EntityType::Account);
        assert_eq!(trail[1].entity_type, EntityType::TransactionGroup);
        assert_eq!(trail[1].entity_name.as_deref(), Some("Deposit for ana"));
    }
}
