//! Account service
//!
//! Account creation and percentage changes keep two rules: an owner has at
//! most one remainder account, and fixed percentages never add up to more
//! than 100%.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::percentage::FULL_BASIS_POINTS;
use crate::models::{
    AccountId, DenominationVector, LedgerAccount, LedgerSubAccount, Money, OwnerId, Percentage,
};
use crate::storage::{LedgerData, Storage};

use super::resolve_account;

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

/// An account with computed balances
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub account: LedgerAccount,
    /// Logical balance
    pub total: Money,
    /// Physical cash held
    pub cash: DenominationVector,
    /// Logical value not yet backed by cash
    pub pending_logical: Money,
    pub sub_account_count: usize,
}

impl<'a> AccountService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create an account for an owner
    pub fn create(
        &self,
        owner_id: OwnerId,
        name: &str,
        percentage: Percentage,
        is_remainder: bool,
        sub_account_capacity: Money,
    ) -> LedgerResult<LedgerAccount> {
        let name = name.trim();
        let mut account = if is_remainder {
            LedgerAccount::remainder(owner_id, name, percentage, sub_account_capacity)
        } else {
            LedgerAccount::new(owner_id, name, percentage, sub_account_capacity)
        };
        account
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let mut tx = self.storage.begin()?;
        tx.owner(owner_id)?;

        if is_remainder {
            if let Some(existing) = tx
                .accounts_of(owner_id)
                .into_iter()
                .find(|a| a.is_remainder)
            {
                return Err(LedgerError::Validation(format!(
                    "'{}' is already the remainder account",
                    existing.name
                )));
            }
        }
        check_percentage_limit(&tx, owner_id, &account, None)?;

        account.sort_order = tx
            .accounts_of(owner_id)
            .iter()
            .map(|a| a.sort_order + 1)
            .max()
            .unwrap_or(0)
            .max(0);
        tx.insert_account(account.clone())?;
        tx.commit()?;

        info!(account = %account.name, percentage = %account.percentage, "account created");
        self.storage.log_create(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &account,
        );

        Ok(account)
    }

    /// Find one of an owner's accounts by name or full id
    pub fn find(&self, owner_id: OwnerId, identifier: &str) -> LedgerResult<LedgerAccount> {
        let data = self.storage.snapshot()?;
        resolve_account(&data, owner_id, identifier).cloned()
    }

    /// All of an owner's accounts with balances, expenses sink first
    pub fn list(&self, owner_id: OwnerId) -> LedgerResult<Vec<AccountSummary>> {
        let data = self.storage.snapshot()?;
        data.owner(owner_id)?;
        Ok(data
            .accounts_of(owner_id)
            .into_iter()
            .map(|account| summarize(&data, account))
            .collect())
    }

    /// Sub-accounts of one account in creation order
    pub fn sub_accounts(
        &self,
        owner_id: OwnerId,
        identifier: &str,
    ) -> LedgerResult<(LedgerAccount, Vec<LedgerSubAccount>)> {
        let data = self.storage.snapshot()?;
        let account = resolve_account(&data, owner_id, identifier)?;
        let subs = data
            .sub_accounts_of(account.id)
            .into_iter()
            .cloned()
            .collect();
        Ok((account.clone(), subs))
    }

    /// Change an account's percentage share
    pub fn set_percentage(
        &self,
        owner_id: OwnerId,
        identifier: &str,
        percentage: Percentage,
    ) -> LedgerResult<LedgerAccount> {
        let mut tx = self.storage.begin()?;
        let before = resolve_account(&tx, owner_id, identifier)?.clone();
        if before.ignore {
            return Err(LedgerError::Validation(format!(
                "'{}' does not take part in distribution",
                before.name
            )));
        }

        let mut after = before.clone();
        after.set_percentage(percentage);
        after
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        check_percentage_limit(&tx, owner_id, &after, Some(after.id))?;

        *tx.account_mut(after.id)? = after.clone();
        tx.commit()?;

        info!(
            account = %after.name,
            from = %before.percentage,
            to = %after.percentage,
            "percentage changed"
        );
        self.storage.log_update(
            EntityType::Account,
            after.id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        );

        Ok(after)
    }
}

fn summarize(data: &LedgerData, account: &LedgerAccount) -> AccountSummary {
    let subs = data.sub_accounts_of(account.id);
    AccountSummary {
        total: subs.iter().map(|s| s.total).sum(),
        cash: data.account_cash(account.id),
        pending_logical: subs.iter().map(|s| s.pending_logical).sum(),
        sub_account_count: subs.len(),
        account: account.clone(),
    }
}

/// Fixed percentages of the owner's accounts, with `candidate` in place of
/// `replacing`, must not exceed 100%
fn check_percentage_limit(
    data: &LedgerData,
    owner_id: OwnerId,
    candidate: &LedgerAccount,
    replacing: Option<AccountId>,
) -> LedgerResult<()> {
    if !candidate.counts_toward_limit() {
        return Ok(());
    }
    let others: Percentage = data
        .accounts_of(owner_id)
        .into_iter()
        .filter(|a| Some(a.id) != replacing && a.counts_toward_limit())
        .map(|a| a.percentage)
        .sum();
    let total = others.basis_points() + candidate.percentage.basis_points();
    if total > FULL_BASIS_POINTS {
        return Err(LedgerError::InvalidPercentage(format!(
            "'{}' at {} would bring the total to {}",
            candidate.name,
            candidate.percentage,
            Percentage::from_basis_points(total)
        )));
    }
    Ok(())
}
