//! In-memory ledger document
//!
//! The whole ledger lives in one JSON document holding one table per entity.
//! Every lookup resolves ids through these tables; nothing holds a live
//! reference to another entity.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AccountId, DenominationVector, ExpenseId, GroupId, LedgerAccount, LedgerSubAccount, Money,
    Owner, OwnerId, RecurringExpense, SubAccountId, TransactionGroup,
};

/// Current on-disk layout of `ledger.json`
pub const LEDGER_SCHEMA_VERSION: u32 = 1;

/// Serializable ledger: owners, accounts, sub-accounts, expenses and the
/// transaction history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerData {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    owners: Vec<Owner>,
    #[serde(default)]
    accounts: Vec<LedgerAccount>,
    #[serde(default)]
    sub_accounts: Vec<LedgerSubAccount>,
    #[serde(default)]
    expenses: Vec<RecurringExpense>,
    #[serde(default)]
    transaction_groups: Vec<TransactionGroup>,
}

impl LedgerData {
    // --- owners ---

    pub fn owners(&self) -> &[Owner] {
        &self.owners
    }

    pub fn owner(&self, id: OwnerId) -> LedgerResult<&Owner> {
        self.owners
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| LedgerError::owner_not_found(id.to_string()))
    }

    pub fn owner_mut(&mut self, id: OwnerId) -> LedgerResult<&mut Owner> {
        self.owners
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| LedgerError::owner_not_found(id.to_string()))
    }

    /// Find an owner by name (case-insensitive)
    pub fn owner_by_name(&self, name: &str) -> Option<&Owner> {
        let name_lower = name.to_lowercase();
        self.owners
            .iter()
            .find(|o| o.name.to_lowercase() == name_lower)
    }

    /// Create an owner together with its ignored expenses sink account
    pub fn create_owner(&mut self, name: &str, sink_capacity: Money) -> LedgerResult<OwnerId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("Owner name cannot be empty".into()));
        }
        if self.owner_by_name(name).is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Owner",
                identifier: name.to_string(),
            });
        }

        let owner_id = OwnerId::new();
        let sink = LedgerAccount::expenses_sink(owner_id, sink_capacity);
        let owner = Owner::with_id(owner_id, name, sink.id);
        self.accounts.push(sink);
        self.owners.push(owner);
        Ok(owner_id)
    }

    // --- accounts ---

    /// An owner's accounts in distribution order
    pub fn accounts_of(&self, owner_id: OwnerId) -> Vec<&LedgerAccount> {
        let mut accounts: Vec<_> = self
            .accounts
            .iter()
            .filter(|a| a.owner_id == owner_id)
            .collect();
        accounts.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then(a.created_at.cmp(&b.created_at))
        });
        accounts
    }

    pub fn account(&self, id: AccountId) -> LedgerResult<&LedgerAccount> {
        self.accounts
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| LedgerError::account_not_found(id.to_string()))
    }

    pub fn account_mut(&mut self, id: AccountId) -> LedgerResult<&mut LedgerAccount> {
        self.accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| LedgerError::account_not_found(id.to_string()))
    }

    /// Find one of an owner's accounts by name (case-insensitive)
    pub fn account_by_name(&self, owner_id: OwnerId, name: &str) -> Option<&LedgerAccount> {
        let name_lower = name.to_lowercase();
        self.accounts
            .iter()
            .find(|a| a.owner_id == owner_id && a.name.to_lowercase() == name_lower)
    }

    pub fn insert_account(&mut self, account: LedgerAccount) -> LedgerResult<()> {
        self.owner(account.owner_id)?;
        if self.account_by_name(account.owner_id, &account.name).is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Account",
                identifier: account.name,
            });
        }
        self.accounts.push(account);
        Ok(())
    }

    /// Logical balance of an account (sum of its sub-account totals)
    pub fn account_total(&self, account_id: AccountId) -> Money {
        self.sub_accounts
            .iter()
            .filter(|s| s.account_id == account_id)
            .map(|s| s.total)
            .sum()
    }

    /// Physical cash held by an account across its sub-accounts
    pub fn account_cash(&self, account_id: AccountId) -> DenominationVector {
        let mut cash = DenominationVector::new();
        for sub in self.sub_accounts.iter().filter(|s| s.account_id == account_id) {
            cash.merge(sub.cash.vector());
        }
        cash
    }

    // --- sub-accounts ---

    /// An account's sub-accounts in creation order
    pub fn sub_accounts_of(&self, account_id: AccountId) -> Vec<&LedgerSubAccount> {
        let mut subs: Vec<_> = self
            .sub_accounts
            .iter()
            .filter(|s| s.account_id == account_id)
            .collect();
        subs.sort_by_key(|s| s.position);
        subs
    }

    /// Ids of an account's sub-accounts in creation order
    pub fn sub_account_ids_of(&self, account_id: AccountId) -> Vec<SubAccountId> {
        self.sub_accounts_of(account_id)
            .into_iter()
            .map(|s| s.id)
            .collect()
    }

    pub fn sub_account(&self, id: SubAccountId) -> LedgerResult<&LedgerSubAccount> {
        self.sub_accounts
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| LedgerError::sub_account_not_found(id.to_string()))
    }

    pub fn sub_account_mut(&mut self, id: SubAccountId) -> LedgerResult<&mut LedgerSubAccount> {
        self.sub_accounts
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| LedgerError::sub_account_not_found(id.to_string()))
    }

    /// Position the next sub-account of `account_id` will get
    pub fn next_sub_account_position(&self, account_id: AccountId) -> u32 {
        self.sub_accounts
            .iter()
            .filter(|s| s.account_id == account_id)
            .map(|s| s.position + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn insert_sub_account(&mut self, sub: LedgerSubAccount) -> LedgerResult<()> {
        self.account(sub.account_id)?;
        self.sub_accounts.push(sub);
        Ok(())
    }

    // --- expenses ---

    /// Every recurring expense of an owner, active or not
    pub fn expenses_of(&self, owner_id: OwnerId) -> Vec<&RecurringExpense> {
        self.expenses
            .iter()
            .filter(|e| e.owner_id == owner_id)
            .collect()
    }

    /// Active recurring expenses of an owner, in creation order
    pub fn active_expenses_of(&self, owner_id: OwnerId) -> Vec<&RecurringExpense> {
        self.expenses
            .iter()
            .filter(|e| e.owner_id == owner_id && e.active)
            .collect()
    }

    /// Find one of an owner's expenses by name (case-insensitive)
    pub fn expense_by_name(&self, owner_id: OwnerId, name: &str) -> Option<&RecurringExpense> {
        let name_lower = name.to_lowercase();
        self.expenses
            .iter()
            .find(|e| e.owner_id == owner_id && e.name.to_lowercase() == name_lower)
    }

    pub fn insert_expense(&mut self, expense: RecurringExpense) -> LedgerResult<()> {
        self.owner(expense.owner_id)?;
        if self.expense_by_name(expense.owner_id, &expense.name).is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Expense",
                identifier: expense.name,
            });
        }
        self.expenses.push(expense);
        Ok(())
    }

    pub fn remove_expense(&mut self, id: ExpenseId) -> LedgerResult<RecurringExpense> {
        let index = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;
        Ok(self.expenses.remove(index))
    }

    // --- history ---

    pub fn push_group(&mut self, group: TransactionGroup) {
        self.transaction_groups.push(group);
    }

    pub fn group(&self, id: GroupId) -> LedgerResult<&TransactionGroup> {
        self.transaction_groups
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| LedgerError::NotFound {
                entity_type: "Transaction group",
                identifier: id.to_string(),
            })
    }

    /// An owner's transaction groups, newest first
    ///
    /// Groups are only ever appended, so storage order is posting order.
    pub fn groups_of(&self, owner_id: OwnerId) -> Vec<&TransactionGroup> {
        self.transaction_groups
            .iter()
            .rev()
            .filter(|g| g.owner_id == owner_id)
            .collect()
    }

    // --- invariants ---

    /// Physical cash held for an owner: sub-account stores plus pending cash
    pub fn physical_total(&self, owner_id: OwnerId) -> LedgerResult<Money> {
        let pending = self
            .owner(owner_id)?
            .pending()
            .map(|p| p.total())
            .unwrap_or_default();
        let in_subs: Money = self
            .owner_sub_accounts(owner_id)
            .map(|s| s.cash.total())
            .sum();
        Ok(pending + in_subs)
    }

    /// Logical total of every sub-account of an owner, expenses sink included
    pub fn logical_total(&self, owner_id: OwnerId) -> Money {
        self.owner_sub_accounts(owner_id).map(|s| s.total).sum()
    }

    /// Physical cash must reproduce the logical balances exactly
    pub fn check_conservation(&self, owner_id: OwnerId) -> LedgerResult<()> {
        let physical = self.physical_total(owner_id)?;
        let logical = self.logical_total(owner_id);
        if physical != logical {
            return Err(LedgerError::Invariant(format!(
                "owner {} holds {} of cash against {} of logical balances",
                owner_id, physical, logical
            )));
        }
        Ok(())
    }

    /// Check every sub-account and every owner
    pub fn check_integrity(&self) -> LedgerResult<()> {
        for sub in &self.sub_accounts {
            sub.check_invariants()?;
        }
        for owner in &self.owners {
            self.check_conservation(owner.id)?;
        }
        Ok(())
    }

    fn owner_sub_accounts(&self, owner_id: OwnerId) -> impl Iterator<Item = &LedgerSubAccount> {
        let account_ids: Vec<AccountId> = self
            .accounts
            .iter()
            .filter(|a| a.owner_id == owner_id)
            .map(|a| a.id)
            .collect();
        self.sub_accounts
            .iter()
            .filter(move |s| account_ids.contains(&s.account_id))
    }
}
