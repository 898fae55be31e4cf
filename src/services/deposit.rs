//! Deposit service
//!
//! Previews, applies and settles deposits. A deposit is validated and
//! planned inside the same transaction that applies it, so the plan always
//! matches the state it is posted against.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::engine::{
    apply_plan, calculate_impact, reallocate, unbacked_sub_accounts, CashChange, DistributionPlan,
};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AccountId, CashStore, DenominationVector, GroupId, GroupKind, Money, OwnerId, TransactionGroup,
};
use crate::storage::Storage;

/// Service for deposits and pending-cash settlement
pub struct DepositService<'a> {
    storage: &'a Storage,
}

/// Logical balance of one account before and after a previewed deposit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountImpact {
    pub account_id: AccountId,
    pub name: String,
    pub before: Money,
    pub after: Money,
}

impl AccountImpact {
    pub fn delta(&self) -> Money {
        self.after - self.before
    }
}

/// What a deposit would do, computed without touching the ledger
#[derive(Debug, Clone)]
pub struct DepositPreview {
    pub cash: DenominationVector,
    pub plan: DistributionPlan,
    /// Expenses account first, then every distributing account
    pub impacts: Vec<AccountImpact>,
}

/// Outcome of an applied deposit
#[derive(Debug, Clone)]
pub struct DepositReceipt {
    pub group_id: GroupId,
    pub plan: DistributionPlan,
    pub pending_before: CashStore,
    pub pending_after: CashStore,
    pub cash_changes: Vec<CashChange>,
}

/// Outcome of settling pending cash
#[derive(Debug, Clone)]
pub struct SettlementReceipt {
    /// `None` when nothing could be placed (nothing was written)
    pub group_id: Option<GroupId>,
    pub pending_before: CashStore,
    pub pending_after: CashStore,
    pub cash_changes: Vec<CashChange>,
}

impl<'a> DepositService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Preview a deposit given as denomination key → count
    pub fn preview_deposit<K: AsRef<str>>(
        &self,
        owner_id: OwnerId,
        denominations: &HashMap<K, i64>,
    ) -> LedgerResult<DepositPreview> {
        let cash = DenominationVector::from_external_map(denominations)?;
        self.preview(owner_id, &cash)
    }

    /// Preview a deposit; never mutates the ledger
    pub fn preview(
        &self,
        owner_id: OwnerId,
        cash: &DenominationVector,
    ) -> LedgerResult<DepositPreview> {
        let data = self.storage.snapshot()?;
        let plan = calculate_impact(&data, owner_id, cash)?;

        let expenses_account_id = data.owner(owner_id)?.expenses_account_id;
        let expenses_before = data.account_total(expenses_account_id);
        let mut impacts = vec![AccountImpact {
            account_id: expenses_account_id,
            name: data.account(expenses_account_id)?.name.clone(),
            before: expenses_before,
            after: expenses_before + plan.total_expenses,
        }];
        impacts.extend(plan.shares.iter().map(|share| {
            let before = data.account_total(share.account_id);
            AccountImpact {
                account_id: share.account_id,
                name: share.name.clone(),
                before,
                after: before + share.amount,
            }
        }));

        Ok(DepositPreview {
            cash: *cash,
            plan,
            impacts,
        })
    }

    /// Apply a deposit given as denomination key → count
    pub fn apply_deposit<K: AsRef<str>>(
        &self,
        owner_id: OwnerId,
        denominations: &HashMap<K, i64>,
    ) -> LedgerResult<DepositReceipt> {
        let cash = DenominationVector::from_external_map(denominations)?;
        self.apply(owner_id, &cash)
    }

    /// Split, post and reallocate a deposit in one transaction
    ///
    /// Validation failures return before anything is mutated. Failures
    /// after that are wrapped in [`LedgerError::ApplyFailed`]; in both cases
    /// the transaction is dropped and the stored ledger is untouched.
    pub fn apply(
        &self,
        owner_id: OwnerId,
        cash: &DenominationVector,
    ) -> LedgerResult<DepositReceipt> {
        let mut tx = self.storage.begin()?;
        let plan = calculate_impact(&tx, owner_id, cash)?;

        let summary = apply_plan(&mut tx, &plan, cash).map_err(LedgerError::rolled_back)?;
        let group = tx.group(summary.group_id)?.clone();
        let owner_name = tx.owner(owner_id)?.name.clone();
        tx.commit().map_err(LedgerError::rolled_back)?;

        self.storage.log_posted(&group, &owner_name);
        if !summary.pending_after.is_empty() {
            info!(pending = %summary.pending_after.vector(), "cash left pending");
        }

        Ok(DepositReceipt {
            group_id: summary.group_id,
            plan,
            pending_before: summary.pending_before,
            pending_after: summary.pending_after,
            cash_changes: summary.cash_changes,
        })
    }

    /// Offer pending cash to every sub-account still waiting for cash
    pub fn settle_pending(&self, owner_id: OwnerId) -> LedgerResult<SettlementReceipt> {
        let mut tx = self.storage.begin()?;
        let pending_before = tx.owner(owner_id)?.pending_snapshot();

        let waiting = unbacked_sub_accounts(&tx, owner_id)?;
        let cash_changes =
            reallocate(&mut tx, owner_id, &waiting).map_err(LedgerError::rolled_back)?;
        let pending_after = tx.owner(owner_id)?.pending_snapshot();

        if cash_changes.is_empty() {
            if !pending_before.is_empty() {
                warn!(pending = %pending_before.vector(), "no pending cash could be placed");
            }
            return Ok(SettlementReceipt {
                group_id: None,
                pending_before,
                pending_after,
                cash_changes,
            });
        }

        let mut group =
            TransactionGroup::new(owner_id, GroupKind::Settlement, "Pending cash settled");
        for change in &cash_changes {
            group.cash.merge(&change.after.checked_sub(&change.before)?);
        }
        let group_id = group.id;
        let owner_name = tx.owner(owner_id)?.name.clone();
        tx.push_group(group.clone());
        tx.commit().map_err(LedgerError::rolled_back)?;

        self.storage.log_posted(&group, &owner_name);
        info!(placed = %group.cash, "pending cash settled");

        Ok(SettlementReceipt {
            group_id: Some(group_id),
            pending_before,
            pending_after,
            cash_changes,
        })
    }
}
