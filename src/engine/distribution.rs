//! Deposit distribution
//!
//! [`calculate_impact`] turns a deposit into a plan: the amount reserved for
//! recurring expenses and one share per account, with the remainder account
//! absorbing every rounding cent. [`apply_plan`] posts that plan inside an
//! open transaction and then hands the deposited notes out to the credited
//! sub-accounts through [`reallocate`].

use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};
use crate::models::percentage::FULL_BASIS_POINTS;
use crate::models::{
    AccountId, CashStore, DenominationVector, EntryKind, ExpenseId, GroupId, GroupKind,
    LedgerEntry, Money, OwnerId, Percentage, SubAccountId, TransactionGroup,
};
use crate::storage::LedgerData;

use super::deposit::{deposit_logical, SubAccountCredit};

/// Amount reserved for one recurring expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseLine {
    pub expense_id: ExpenseId,
    pub name: String,
    pub amount: Money,
}

/// Amount one account receives from a deposit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountShare {
    pub account_id: AccountId,
    pub name: String,
    pub percentage: Percentage,
    pub is_remainder: bool,
    pub amount: Money,
}

/// Result of [`calculate_impact`]; pure data, safe to preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionPlan {
    pub owner_id: OwnerId,
    pub total_deposit: Money,
    pub total_expenses: Money,
    pub remaining_after_expenses: Money,
    pub expense_lines: Vec<ExpenseLine>,
    /// Every distributing account in order, zero shares included
    pub shares: Vec<AccountShare>,
}

impl DistributionPlan {
    /// Sum of all account shares (equals `remaining_after_expenses`)
    pub fn shares_total(&self) -> Money {
        self.shares.iter().map(|s| s.amount).sum()
    }

    pub fn share_for(&self, account_id: AccountId) -> Option<&AccountShare> {
        self.shares.iter().find(|s| s.account_id == account_id)
    }
}

/// Physical cash a sub-account received during reallocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashChange {
    pub sub_account_id: SubAccountId,
    pub account_id: AccountId,
    pub name: String,
    pub before: DenominationVector,
    pub after: DenominationVector,
    pub inserted: Money,
}

/// Result of [`apply_plan`]
#[derive(Debug, Clone)]
pub struct ApplySummary {
    pub group_id: GroupId,
    pub pending_before: CashStore,
    pub pending_after: CashStore,
    pub cash_changes: Vec<CashChange>,
}

/// Compute how a deposit would be split; never mutates anything
pub fn calculate_impact(
    ledger: &LedgerData,
    owner_id: OwnerId,
    deposit: &DenominationVector,
) -> LedgerResult<DistributionPlan> {
    ledger.owner(owner_id)?;

    let accounts: Vec<_> = ledger
        .accounts_of(owner_id)
        .into_iter()
        .filter(|a| !a.ignore)
        .collect();
    if accounts.is_empty() {
        return Err(LedgerError::NoAccounts);
    }

    let remainder_count = accounts.iter().filter(|a| a.is_remainder).count();
    if remainder_count != 1 {
        return Err(LedgerError::MissingRemainderAccount {
            found: remainder_count,
        });
    }

    if let Some(negative) = accounts
        .iter()
        .find(|a| !a.is_remainder && a.percentage.is_negative())
    {
        return Err(LedgerError::InvalidPercentage(format!(
            "'{}' has a negative percentage ({})",
            negative.name, negative.percentage
        )));
    }
    let percentage_sum: Percentage = accounts
        .iter()
        .filter(|a| a.counts_toward_limit())
        .map(|a| a.percentage)
        .sum();
    if percentage_sum.basis_points() > FULL_BASIS_POINTS {
        return Err(LedgerError::InvalidPercentage(format!(
            "percentages add up to {}, more than 100%",
            percentage_sum
        )));
    }

    let total_deposit = deposit.total_value();
    if total_deposit.is_zero() {
        return Err(LedgerError::EmptyDeposit);
    }

    // Each term is already rounded to the cent, so rounding the grand total
    // up to the cent cannot change it.
    let expense_lines: Vec<ExpenseLine> = ledger
        .active_expenses_of(owner_id)
        .into_iter()
        .map(|e| ExpenseLine {
            expense_id: e.id,
            name: e.name.clone(),
            amount: e.per_deposit(),
        })
        .collect();
    let total_expenses: Money = expense_lines.iter().map(|l| l.amount).sum();

    let remaining_after_expenses = total_deposit - total_expenses;
    if remaining_after_expenses.is_negative() {
        return Err(LedgerError::InsufficientDeposit {
            deposit: total_deposit,
            expenses: total_expenses,
            shortfall: -remaining_after_expenses,
        });
    }

    let mut shares: Vec<AccountShare> = accounts
        .iter()
        .map(|a| AccountShare {
            account_id: a.id,
            name: a.name.clone(),
            percentage: a.percentage,
            is_remainder: a.is_remainder,
            amount: if a.is_remainder || a.percentage.is_zero() {
                Money::zero()
            } else {
                a.percentage.of(remaining_after_expenses)
            },
        })
        .collect();

    let fixed_total: Money = shares.iter().map(|s| s.amount).sum();
    let mut residue = remaining_after_expenses - fixed_total;
    if residue.is_negative() {
        residue = return_overshoot(&mut shares, remaining_after_expenses, residue)?;
    }
    if let Some(remainder) = shares.iter_mut().find(|s| s.is_remainder) {
        remainder.amount = residue;
    }

    debug!(
        owner = %owner_id,
        deposit = %total_deposit,
        expenses = %total_expenses,
        "distribution plan computed"
    );

    Ok(DistributionPlan {
        owner_id,
        total_deposit,
        total_expenses,
        remaining_after_expenses,
        expense_lines,
        shares,
    })
}

/// Rounding half away from zero can push the fixed shares a few cents past
/// the amount being split. Take one cent back from each share that was
/// rounded up, last account first, until the remainder is no longer
/// negative.
fn return_overshoot(
    shares: &mut [AccountShare],
    remaining: Money,
    mut residue: Money,
) -> LedgerResult<Money> {
    let one_cent = Money::from_cents(1);
    for share in shares.iter_mut().rev().filter(|s| !s.is_remainder) {
        if !residue.is_negative() {
            break;
        }
        let exact = i128::from(remaining.cents()) * i128::from(share.percentage.basis_points());
        let rounded = i128::from(share.amount.cents()) * i128::from(FULL_BASIS_POINTS);
        if rounded > exact {
            share.amount -= one_cent;
            residue += one_cent;
        }
    }
    if residue.is_negative() {
        return Err(LedgerError::Invariant(format!(
            "shares of {} overshoot by {}",
            remaining, -residue
        )));
    }
    Ok(residue)
}

/// Post a plan inside an open transaction
///
/// Credits the expenses account once per expense line and every account with
/// a non-zero share, parks `deposit` in the owner's pending cash and then
/// reallocates it over the sub-accounts just credited. The new transaction
/// group is appended to the ledger; committing is left to the caller.
pub fn apply_plan(
    ledger: &mut LedgerData,
    plan: &DistributionPlan,
    deposit: &DenominationVector,
) -> LedgerResult<ApplySummary> {
    if deposit.total_value() != plan.total_deposit {
        return Err(LedgerError::Invariant(format!(
            "deposit of {} does not match the plan's {}",
            deposit.total_value(),
            plan.total_deposit
        )));
    }

    let owner = ledger.owner(plan.owner_id)?;
    let expenses_account_id = owner.expenses_account_id;
    let pending_before = owner.pending_snapshot();

    let mut group = TransactionGroup::new(plan.owner_id, GroupKind::Deposit, "Deposit");
    group.cash = *deposit;

    let mut credited: Vec<SubAccountId> = Vec::new();
    let mut remember = |credits: Vec<SubAccountCredit>| {
        for credit in credits {
            if !credited.contains(&credit.sub_account_id) {
                credited.push(credit.sub_account_id);
            }
        }
    };

    for line in plan.expense_lines.iter().filter(|l| l.amount.is_positive()) {
        remember(deposit_logical(ledger, expenses_account_id, line.amount)?);
        group.push(LedgerEntry::new(
            EntryKind::Expense,
            expenses_account_id,
            line.amount,
            line.name.clone(),
        ));
    }

    for share in plan.shares.iter().filter(|s| s.amount.is_positive()) {
        remember(deposit_logical(ledger, share.account_id, share.amount)?);
        group.push(LedgerEntry::new(
            EntryKind::Income,
            share.account_id,
            share.amount,
            share.name.clone(),
        ));
    }

    ledger.owner_mut(plan.owner_id)?.pending_mut().add(deposit);

    let cash_changes = reallocate(ledger, plan.owner_id, &credited)?;
    let pending_after = ledger.owner(plan.owner_id)?.pending_snapshot();

    let group_id = group.id;
    ledger.push_group(group);

    info!(
        group = %group_id,
        deposit = %plan.total_deposit,
        pending = %pending_after.total(),
        "deposit applied"
    );

    Ok(ApplySummary {
        group_id,
        pending_before,
        pending_after,
        cash_changes,
    })
}

/// Hand pending cash out to sub-accounts with un-backed logical value
///
/// Visits `sub_account_ids` in order and greedily inserts from the owner's
/// pending cash up to each sub-account's pending logical amount. Whatever
/// cannot be placed goes back to pending.
pub fn reallocate(
    ledger: &mut LedgerData,
    owner_id: OwnerId,
    sub_account_ids: &[SubAccountId],
) -> LedgerResult<Vec<CashChange>> {
    let mut pool = ledger.owner_mut(owner_id)?.pending_mut().take_all();
    let mut changes = Vec::new();

    for &sub_id in sub_account_ids {
        if pool.is_empty() {
            break;
        }
        let sub = ledger.sub_account_mut(sub_id)?;
        if !sub.pending_logical.is_positive() {
            continue;
        }

        let before = *sub.cash.vector();
        let inserted = sub.back_with(&mut pool);
        if inserted.is_zero() {
            continue;
        }
        changes.push(CashChange {
            sub_account_id: sub_id,
            account_id: sub.account_id,
            name: sub.name.clone(),
            before,
            after: *sub.cash.vector(),
            inserted,
        });
    }

    ledger.owner_mut(owner_id)?.pending_mut().add(&pool);
    Ok(changes)
}

/// Every sub-account of an owner still waiting for cash, expenses account
/// first, then accounts in distribution order
pub fn unbacked_sub_accounts(
    ledger: &LedgerData,
    owner_id: OwnerId,
) -> LedgerResult<Vec<SubAccountId>> {
    let expenses_account_id = ledger.owner(owner_id)?.expenses_account_id;
    let mut account_ids = vec![expenses_account_id];
    account_ids.extend(
        ledger
            .accounts_of(owner_id)
            .into_iter()
            .map(|a| a.id)
            .filter(|id| *id != expenses_account_id),
    );

    Ok(account_ids
        .into_iter()
        .flat_map(|id| ledger.sub_accounts_of(id))
        .filter(|s| s.pending_logical.is_positive())
        .map(|s| s.id)
        .collect())
}
