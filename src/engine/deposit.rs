//! Logical deposits into an account's sub-accounts
//!
//! Only logical totals change here. Physical cash reaches the sub-accounts
//! later, through reallocation.

use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountId, LedgerSubAccount, Money, SubAccountId};
use crate::storage::LedgerData;

/// Logical amount placed in one sub-account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubAccountCredit {
    pub sub_account_id: SubAccountId,
    pub amount: Money,
    /// The sub-account was created by this deposit
    pub created: bool,
}

/// Spread `amount` over the account's sub-accounts
///
/// Unfilled sub-accounts are topped up in creation order with
/// `min(remaining, capacity - total)`; when none has room a new one is
/// created with the account's sub-account capacity. Returns one credit per
/// sub-account touched, in the order they were credited.
pub fn deposit_logical(
    ledger: &mut LedgerData,
    account_id: AccountId,
    amount: Money,
) -> LedgerResult<Vec<SubAccountCredit>> {
    if amount.is_negative() {
        return Err(LedgerError::Validation(format!(
            "cannot deposit a negative amount ({})",
            amount
        )));
    }

    let account = ledger.account(account_id)?;
    let capacity = account.sub_account_capacity;
    let account_name = account.name.clone();
    if !capacity.is_positive() {
        return Err(LedgerError::Invariant(format!(
            "account '{}' has a non-positive sub-account capacity ({})",
            account_name, capacity
        )));
    }

    let mut remaining = amount;
    let mut credits = Vec::new();

    for sub_id in ledger.sub_account_ids_of(account_id) {
        if remaining.is_zero() {
            break;
        }
        let sub = ledger.sub_account_mut(sub_id)?;
        let room = sub.remaining_capacity();
        if sub.is_filled || !room.is_positive() {
            continue;
        }
        let portion = remaining.min(room);
        sub.credit(portion)?;
        remaining -= portion;
        credits.push(SubAccountCredit {
            sub_account_id: sub_id,
            amount: portion,
            created: false,
        });
    }

    while remaining.is_positive() {
        let position = ledger.next_sub_account_position(account_id);
        let name = format!("{} #{}", account_name, position + 1);
        let mut sub = LedgerSubAccount::new(account_id, name, position, capacity);
        let portion = remaining.min(capacity);
        sub.credit(portion)?;
        remaining -= portion;

        debug!(account = %account_name, position, "opened sub-account");
        credits.push(SubAccountCredit {
            sub_account_id: sub.id,
            amount: portion,
            created: true,
        });
        ledger.insert_sub_account(sub)?;
    }

    Ok(credits)
}
