//! Transfer service
//!
//! Moves physical notes and the matching logical value from one account to
//! another. The notes leave the source through extraction, pass through the
//! owner's pending cash and are reallocated to the destination's credited
//! sub-accounts, so whatever the greedy insert cannot place stays pending.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::engine::{deposit_logical, extract_cash, reallocate, CashChange};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AccountId, DenominationVector, EntryKind, GroupId, GroupKind, LedgerEntry, Money, OwnerId,
    TransactionGroup,
};
use crate::storage::Storage;

use super::resolve_account;

/// Service for transfers between two accounts of one owner
pub struct TransferService<'a> {
    storage: &'a Storage,
}

/// Outcome of a transfer
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub group_id: GroupId,
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: Money,
    pub moved: DenominationVector,
    /// Cash placed in the destination's sub-accounts
    pub cash_changes: Vec<CashChange>,
}

impl<'a> TransferService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Transfer the given denomination key → count map
    pub fn transfer<K: AsRef<str>>(
        &self,
        owner_id: OwnerId,
        from: &str,
        to: &str,
        denominations: &HashMap<K, i64>,
        description: Option<&str>,
    ) -> LedgerResult<TransferReceipt> {
        let requested = DenominationVector::from_external_map(denominations)?;
        self.transfer_cash(owner_id, from, to, &requested, description)
    }

    /// Transfer exactly `requested` from one account to another
    pub fn transfer_cash(
        &self,
        owner_id: OwnerId,
        from: &str,
        to: &str,
        requested: &DenominationVector,
        description: Option<&str>,
    ) -> LedgerResult<TransferReceipt> {
        if requested.is_empty() {
            return Err(LedgerError::Validation(
                "Transfer must move at least one note or coin".into(),
            ));
        }

        let mut tx = self.storage.begin()?;
        let source = resolve_account(&tx, owner_id, from)?.clone();
        let target = resolve_account(&tx, owner_id, to)?.clone();
        if source.id == target.id {
            return Err(LedgerError::Validation(format!(
                "Cannot transfer from '{}' to itself",
                source.name
            )));
        }

        let summary = extract_cash(&mut tx, source.id, requested)?;
        if !summary.satisfied {
            warn!(account = %source.name, missing = %summary.not_satisfied, "transfer refused");
            return Err(LedgerError::InsufficientCash {
                account: source.name,
                unsatisfied: summary.not_satisfied,
            });
        }
        let amount = summary.extracted_value();

        let credited: Vec<_> = deposit_logical(&mut tx, target.id, amount)
            .map_err(LedgerError::rolled_back)?
            .into_iter()
            .map(|credit| credit.sub_account_id)
            .collect();
        tx.owner_mut(owner_id)?.pending_mut().add(&summary.extracted);
        let cash_changes =
            reallocate(&mut tx, owner_id, &credited).map_err(LedgerError::rolled_back)?;

        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} -> {}", source.name, target.name));

        let mut group = TransactionGroup::new(owner_id, GroupKind::Transfer, description.as_str());
        group.cash = summary.extracted;
        group.push(LedgerEntry::new(
            EntryKind::Transfer,
            source.id,
            -amount,
            description.as_str(),
        ));
        group.push(LedgerEntry::new(
            EntryKind::Transfer,
            target.id,
            amount,
            description.as_str(),
        ));
        let group_id = group.id;
        let owner_name = tx.owner(owner_id)?.name.clone();
        tx.push_group(group.clone());
        tx.commit().map_err(LedgerError::rolled_back)?;

        info!(from = %source.name, to = %target.name, amount = %amount, "transfer posted");
        self.storage.log_posted(&group, &owner_name);

        Ok(TransferReceipt {
            group_id,
            from_account_id: source.id,
            to_account_id: target.id,
            amount,
            moved: summary.extracted,
            cash_changes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Denomination;
    use crate::services::test_support::{create_storage, standard_owner};
    use crate::services::DepositService;

    fn cash(entries: &[(&str, i64)]) -> HashMap<String, i64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    /// Principal 2x20 + 1x10, Ahorro 1x20 + 1x10, Gastos 1x20
    fn funded_owner(storage: &Storage) -> OwnerId {
        let owner_id = standard_owner(storage);
        DepositService::new(storage)
            .apply_deposit(owner_id, &cash(&[("20", 4), ("10", 2)]))
            .unwrap();
        owner_id
    }

    #[test]
    fn test_transfer_conserves_value() {
        let (_temp, storage) = create_storage();
        let owner_id = funded_owner(&storage);
        let before = storage.snapshot().unwrap();
        let logical_before = before.logical_total(owner_id);
        let physical_before = before.physical_total(owner_id).unwrap();

        let receipt = TransferService::new(&storage)
            .transfer(owner_id, "Principal", "Ahorro", &cash(&[("20", 1)]), None)
            .unwrap();

        assert_eq!(receipt.amount, Money::from_cents(2_000));
        assert_eq!(receipt.moved.count(Denomination::Twenty), 1);
        assert_eq!(receipt.cash_changes.len(), 1);
        assert_eq!(receipt.cash_changes[0].inserted, Money::from_cents(2_000));

        let after = storage.snapshot().unwrap();
        after.check_integrity().unwrap();
        assert_eq!(after.logical_total(owner_id), logical_before);
        assert_eq!(after.physical_total(owner_id).unwrap(), physical_before);
        assert_eq!(after.account_total(receipt.from_account_id), Money::from_cents(3_000));
        assert_eq!(after.account_total(receipt.to_account_id), Money::from_cents(5_000));

        let group = after.group(receipt.group_id).unwrap();
        assert_eq!(group.kind, GroupKind::Transfer);
        assert_eq!(group.description, "Principal -> Ahorro");
        assert!(group.net_amount().is_zero());
    }

    #[test]
    fn test_transfer_shortfall_and_same_account() {
        let (_temp, storage) = create_storage();
        let owner_id = funded_owner(&storage);
        let service = TransferService::new(&storage);

        assert!(matches!(
            service.transfer(owner_id, "Gastos", "Ahorro", &cash(&[("10", 1)]), None),
            Err(LedgerError::InsufficientCash { .. })
        ));
        assert!(service
            .transfer(owner_id, "Ahorro", "ahorro", &cash(&[("10", 1)]), None)
            .unwrap_err()
            .is_validation());

        assert_eq!(storage.snapshot().unwrap().groups_of(owner_id).len(), 1);
    }
}
