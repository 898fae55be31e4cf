//! Withdrawal service
//!
//! A withdrawal names the exact notes to take out of one account. It either
//! produces all of them or nothing is written.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::engine::{extract_cash, SubAccountExtraction};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AccountId, DenominationVector, EntryKind, GroupId, GroupKind, LedgerEntry, Money, OwnerId,
    TransactionGroup,
};
use crate::storage::Storage;

use super::resolve_account;

/// Service for cash withdrawals
pub struct WithdrawalService<'a> {
    storage: &'a Storage,
}

/// Outcome of a withdrawal
#[derive(Debug, Clone)]
pub struct WithdrawalReceipt {
    pub group_id: GroupId,
    pub account_id: AccountId,
    pub extracted: DenominationVector,
    pub value: Money,
    /// Cash taken from each sub-account, in the order visited
    pub breakdown: Vec<SubAccountExtraction>,
}

impl<'a> WithdrawalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Withdraw the given denomination key → count map from an account
    pub fn withdraw<K: AsRef<str>>(
        &self,
        owner_id: OwnerId,
        account: &str,
        denominations: &HashMap<K, i64>,
        description: Option<&str>,
    ) -> LedgerResult<WithdrawalReceipt> {
        let requested = DenominationVector::from_external_map(denominations)?;
        self.withdraw_cash(owner_id, account, &requested, description)
    }

    /// Withdraw exactly `requested` from an account
    ///
    /// Fails with [`LedgerError::InsufficientCash`] when the account's
    /// sub-accounts cannot produce every note; the transaction is dropped and
    /// the ledger keeps its previous state.
    pub fn withdraw_cash(
        &self,
        owner_id: OwnerId,
        account: &str,
        requested: &DenominationVector,
        description: Option<&str>,
    ) -> LedgerResult<WithdrawalReceipt> {
        if requested.is_empty() {
            return Err(LedgerError::Validation(
                "Withdrawal must request at least one note or coin".into(),
            ));
        }

        let mut tx = self.storage.begin()?;
        let account = resolve_account(&tx, owner_id, account)?.clone();

        let summary = extract_cash(&mut tx, account.id, requested)?;
        if !summary.satisfied {
            warn!(
                account = %account.name,
                missing = %summary.not_satisfied,
                "withdrawal refused"
            );
            return Err(LedgerError::InsufficientCash {
                account: account.name,
                unsatisfied: summary.not_satisfied,
            });
        }

        let value = summary.extracted_value();
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or("Withdrawal");

        let mut group = TransactionGroup::new(owner_id, GroupKind::Withdrawal, description);
        group.cash = summary.extracted;
        group.push(LedgerEntry::new(
            EntryKind::Withdrawal,
            account.id,
            -value,
            description,
        ));
        let group_id = group.id;
        let owner_name = tx.owner(owner_id)?.name.clone();
        tx.push_group(group.clone());
        tx.commit().map_err(LedgerError::rolled_back)?;

        info!(
            account = %account.name,
            amount = %value,
            cash = %summary.extracted,
            "withdrawal posted"
        );
        self.storage.log_posted(&group, &owner_name);

        Ok(WithdrawalReceipt {
            group_id,
            account_id: account.id,
            extracted: summary.extracted,
            value,
            breakdown: summary.breakdown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Denomination;
    use crate::services::test_support::{create_storage, standard_owner};
    use crate::services::{AccountService, DepositService};

    fn cash(entries: &[(&str, i64)]) -> HashMap<String, i64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    /// Principal ends up holding 2x20 and 1x10 (50.00 of 100.00)
    fn funded_owner(storage: &Storage) -> OwnerId {
        let owner_id = standard_owner(storage);
        DepositService::new(storage)
            .apply_deposit(owner_id, &cash(&[("20", 4), ("10", 2)]))
            .unwrap();
        owner_id
    }

    #[test]
    fn test_withdraw_posts_group() {
        let (_temp, storage) = create_storage();
        let owner_id = funded_owner(&storage);
        let principal_before = AccountService::new(&storage)
            .find(owner_id, "Principal")
            .unwrap();

        let receipt = WithdrawalService::new(&storage)
            .withdraw(owner_id, "principal", &cash(&[("20", 1)]), Some("Mercado"))
            .unwrap();

        assert_eq!(receipt.account_id, principal_before.id);
        assert_eq!(receipt.value, Money::from_cents(2_000));
        assert_eq!(receipt.extracted.count(Denomination::Twenty), 1);
        assert_eq!(receipt.breakdown.len(), 1);

        let data = storage.snapshot().unwrap();
        data.check_integrity().unwrap();
        assert_eq!(data.account_total(receipt.account_id), Money::from_cents(3_000));
        let group = data.group(receipt.group_id).unwrap();
        assert_eq!(group.kind, GroupKind::Withdrawal);
        assert_eq!(group.description, "Mercado");
        assert_eq!(group.net_amount(), Money::from_cents(-2_000));
    }

    #[test]
    fn test_shortfall_leaves_state_unchanged() {
        let (_temp, storage) = create_storage();
        let owner_id = funded_owner(&storage);
        let before = storage.snapshot().unwrap();

        let err = WithdrawalService::new(&storage)
            .withdraw(owner_id, "Principal", &cash(&[("20", 2), ("10", 2)]), None)
            .unwrap_err();

        match err {
            LedgerError::InsufficientCash { account, unsatisfied } => {
                assert_eq!(account, "Principal");
                assert_eq!(unsatisfied.count(Denomination::Ten), 1);
                assert_eq!(unsatisfied.piece_count(), 1);
            }
            other => panic!("unexpected error: {other}"),
        }

        let after = storage.snapshot().unwrap();
        let principal = after.account_by_name(owner_id, "Principal").unwrap().id;
        assert_eq!(after.account_total(principal), before.account_total(principal));
        assert_eq!(after.account_cash(principal), before.account_cash(principal));
        assert_eq!(after.groups_of(owner_id).len(), 1);
    }

    #[test]
    fn test_withdraw_rejects_bad_requests() {
        let (_temp, storage) = create_storage();
        let owner_id = funded_owner(&storage);
        let service = WithdrawalService::new(&storage);

        assert!(service
            .withdraw(owner_id, "Principal", &HashMap::<String, i64>::new(), None)
            .unwrap_err()
            .is_validation());
        assert!(service
            .withdraw(owner_id, "Viajes", &cash(&[("20", 1)]), None)
            .unwrap_err()
            .is_not_found());
        assert!(matches!(
            service.withdraw(owner_id, "Principal", &cash(&[("25", 1)]), None),
            Err(LedgerError::InvalidDenomination(_))
        ));
    }
}
