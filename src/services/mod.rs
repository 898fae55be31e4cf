//! Service layer for cash-envelope
//!
//! Services own the transaction boundary: each mutating operation opens a
//! [`LedgerTx`](crate::storage::LedgerTx), runs the engine against it,
//! commits, and only then writes the audit log.

pub mod account;
pub mod deposit;
pub mod expense;
pub mod history;
pub mod owner;
pub mod transfer;
pub mod withdrawal;

pub use account::{AccountService, AccountSummary};
pub use deposit::{AccountImpact, DepositPreview, DepositReceipt, DepositService, SettlementReceipt};
pub use expense::ExpenseService;
pub use history::HistoryService;
pub use owner::{OwnerService, OwnerSummary};
pub use transfer::{TransferReceipt, TransferService};
pub use withdrawal::{WithdrawalReceipt, WithdrawalService};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountId, LedgerAccount, OwnerId};
use crate::storage::LedgerData;

/// Resolve one of an owner's accounts by name or full id
pub(crate) fn resolve_account<'d>(
    data: &'d LedgerData,
    owner_id: OwnerId,
    identifier: &str,
) -> LedgerResult<&'d LedgerAccount> {
    if let Some(account) = data.account_by_name(owner_id, identifier) {
        return Ok(account);
    }
    if let Ok(id) = identifier.parse::<AccountId>() {
        if let Ok(account) = data.account(id) {
            if account.owner_id == owner_id {
                return Ok(account);
            }
        }
    }
    Err(LedgerError::account_not_found(identifier))
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared fixtures for service tests

    use tempfile::TempDir;

    use crate::config::paths::LedgerPaths;
    use crate::models::{Money, OwnerId, Percentage};
    use crate::storage::Storage;

    use super::{AccountService, ExpenseService, OwnerService};

    pub fn capacity() -> Money {
        Money::from_cents(100_000)
    }

    pub fn create_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    /// Owner "ana" with Principal 50%, Ahorro 30% and Gastos as the
    /// remainder (20%)
    pub fn standard_owner(storage: &Storage) -> OwnerId {
        let owner = OwnerService::new(storage).create("ana", capacity()).unwrap();
        let accounts = AccountService::new(storage);
        accounts
            .create(owner.id, "Principal", Percentage::from_whole(50), false, capacity())
            .unwrap();
        accounts
            .create(owner.id, "Ahorro", Percentage::from_whole(30), false, capacity())
            .unwrap();
        accounts
            .create(owner.id, "Gastos", Percentage::from_whole(20), true, capacity())
            .unwrap();
        owner.id
    }

    /// [`standard_owner`] plus a monthly expense of 15.00
    pub fn owner_with_expense(storage: &Storage) -> OwnerId {
        let owner_id = standard_owner(storage);
        ExpenseService::new(storage)
            .add(
                owner_id,
                "Internet",
                Money::from_cents(1_500),
                crate::models::ExpenseFrequency::Monthly,
            )
            .unwrap();
        owner_id
    }
}
