//! Core data models for cash-envelope
//!
//! This module contains the data structures of the ledger: denominations and
//! cash stores, owners, accounts and their sub-accounts, recurring expenses
//! and the transaction groups that record every operation.

pub mod account;
pub mod cash;
pub mod denomination;
pub mod expense;
pub mod ids;
pub mod ledger;
pub mod money;
pub mod owner;
pub mod percentage;
pub mod sub_account;

pub use account::{AccountRole, LedgerAccount, EXPENSES_ACCOUNT_NAME};
pub use cash::{CashStore, DenominationVector, MAX_PIECE_COUNT};
pub use denomination::{Denomination, DENOMINATION_COUNT};
pub use expense::{ExpenseFrequency, RecurringExpense};
pub use ids::{AccountId, EntryId, ExpenseId, GroupId, OwnerId, SubAccountId};
pub use ledger::{EntryKind, GroupKind, LedgerEntry, TransactionGroup};
pub use money::Money;
pub use owner::Owner;
pub use percentage::Percentage;
pub use sub_account::LedgerSubAccount;
