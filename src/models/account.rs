//! Ledger account model
//!
//! A ledger account ("cuenta") is a budgeting envelope that receives a
//! percentage of every deposit. Its balance lives in an ordered list of
//! sub-accounts, each backed by physical cash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, OwnerId};
use super::money::Money;
use super::percentage::Percentage;

/// Name given to the expenses sink created with every owner
pub const EXPENSES_ACCOUNT_NAME: &str = "Expenses";

/// How an account takes part in deposit distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    /// Receives a fixed percentage
    Share,
    /// Receives whatever the fixed shares leave over
    Remainder,
    /// Excluded from distribution (the expenses sink)
    Ignored,
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Share => write!(f, "Share"),
            Self::Remainder => write!(f, "Remainder"),
            Self::Ignored => write!(f, "Ignored"),
        }
    }
}

/// A budgeting envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerAccount {
    /// Unique identifier
    pub id: AccountId,

    /// Owner this account belongs to
    pub owner_id: OwnerId,

    /// Account name (e.g., "Ahorro")
    pub name: String,

    /// Share of each deposit (ignored for the remainder account)
    pub percentage: Percentage,

    /// Whether this account absorbs what the fixed shares leave over
    #[serde(default)]
    pub is_remainder: bool,

    /// Whether this account is excluded from distribution
    #[serde(default)]
    pub ignore: bool,

    /// Capacity given to each new sub-account
    pub sub_account_capacity: Money,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,

    /// Sort order for display and distribution
    #[serde(default)]
    pub sort_order: i32,
}

impl LedgerAccount {
    /// Create a new account with a fixed percentage share
    pub fn new(
        owner_id: OwnerId,
        name: impl Into<String>,
        percentage: Percentage,
        sub_account_capacity: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            owner_id,
            name: name.into(),
            percentage,
            is_remainder: false,
            ignore: false,
            sub_account_capacity,
            created_at: now,
            updated_at: now,
            sort_order: 0,
        }
    }

    /// Create the remainder account
    pub fn remainder(
        owner_id: OwnerId,
        name: impl Into<String>,
        percentage: Percentage,
        sub_account_capacity: Money,
    ) -> Self {
        let mut account = Self::new(owner_id, name, percentage, sub_account_capacity);
        account.is_remainder = true;
        account
    }

    /// Create the owner's expenses sink
    pub fn expenses_sink(owner_id: OwnerId, sub_account_capacity: Money) -> Self {
        let mut account = Self::new(
            owner_id,
            EXPENSES_ACCOUNT_NAME,
            Percentage::zero(),
            sub_account_capacity,
        );
        account.ignore = true;
        account.sort_order = -1;
        account
    }

    /// Role in distribution
    pub fn role(&self) -> AccountRole {
        if self.ignore {
            AccountRole::Ignored
        } else if self.is_remainder {
            AccountRole::Remainder
        } else {
            AccountRole::Share
        }
    }

    /// Whether the account's percentage counts toward the 100% limit
    pub fn counts_toward_limit(&self) -> bool {
        self.role() == AccountRole::Share && !self.percentage.is_zero()
    }

    /// Change the percentage share
    pub fn set_percentage(&mut self, percentage: Percentage) {
        self.percentage = percentage;
        self.updated_at = Utc::now();
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(AccountValidationError::NameTooLong(self.name.len()));
        }

        if !self.percentage.is_valid() {
            return Err(AccountValidationError::PercentageOutOfRange(self.percentage));
        }

        if !self.sub_account_capacity.is_positive() {
            return Err(AccountValidationError::NonPositiveCapacity(
                self.sub_account_capacity,
            ));
        }

        if self.ignore && self.is_remainder {
            return Err(AccountValidationError::IgnoredRemainder);
        }

        Ok(())
    }
}

impl fmt::Display for LedgerAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role() {
            AccountRole::Share => write!(f, "{} ({})", self.name, self.percentage),
            AccountRole::Remainder => write!(f, "{} (remainder)", self.name),
            AccountRole::Ignored => write!(f, "{} (ignored)", self.name),
        }
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
    PercentageOutOfRange(Percentage),
    NonPositiveCapacity(Money),
    IgnoredRemainder,
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max 100)", len)
            }
            Self::PercentageOutOfRange(p) => {
                write!(f, "Percentage {} is outside 0%..100%", p)
            }
            Self::NonPositiveCapacity(c) => {
                write!(f, "Sub-account capacity must be positive, got {}", c)
            }
            Self::IgnoredRemainder => {
                write!(f, "An ignored account cannot be the remainder account")
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity() -> Money {
        Money::from_cents(50_000)
    }

    #[test]
    fn test_new_account() {
        let owner = OwnerId::new();
        let account = LedgerAccount::new(owner, "Ahorro", Percentage::from_whole(30), capacity());
        assert_eq!(account.name, "Ahorro");
        assert_eq!(account.owner_id, owner);
        assert_eq!(account.role(), AccountRole::Share);
        assert!(account.counts_toward_limit());
    }

    #[test]
    fn test_roles() {
        let owner = OwnerId::new();
        let remainder =
            LedgerAccount::remainder(owner, "Gastos", Percentage::from_whole(20), capacity());
        assert_eq!(remainder.role(), AccountRole::Remainder);
        assert!(!remainder.counts_toward_limit());

        let sink = LedgerAccount::expenses_sink(owner, capacity());
        assert_eq!(sink.role(), AccountRole::Ignored);
        assert_eq!(sink.name, EXPENSES_ACCOUNT_NAME);
        assert!(!sink.counts_toward_limit());

        let zero = LedgerAccount::new(owner, "Idle", Percentage::zero(), capacity());
        assert!(!zero.counts_toward_limit());
    }

    #[test]
    fn test_validation() {
        let owner = OwnerId::new();
        let mut account =
            LedgerAccount::new(owner, "Valid", Percentage::from_whole(10), capacity());
        assert!(account.validate().is_ok());

        account.name = String::new();
        assert_eq!(account.validate(), Err(AccountValidationError::EmptyName));

        account.name = "Valid".into();
        account.percentage = Percentage::from_whole(101);
        assert!(matches!(
            account.validate(),
            Err(AccountValidationError::PercentageOutOfRange(_))
        ));

        account.percentage = Percentage::from_whole(10);
        account.sub_account_capacity = Money::zero();
        assert!(matches!(
            account.validate(),
            Err(AccountValidationError::NonPositiveCapacity(_))
        ));
    }

    #[test]
    fn test_display() {
        let owner = OwnerId::new();
        let account =
            LedgerAccount::new(owner, "Principal", Percentage::from_whole(50), capacity());
        assert_eq!(format!("{}", account), "Principal (50%)");
    }

    #[test]
    fn test_serialization() {
        let account = LedgerAccount::expenses_sink(OwnerId::new(), capacity());
        let json = serde_json::to_string(&account).unwrap();
        let deserialized: LedgerAccount = serde_json::from_str(&json).unwrap();
        assert_eq!(account.id, deserialized.id);
        assert!(deserialized.ignore);
    }
}
