//! Transaction groups and ledger entries
//!
//! Every user-initiated operation produces one transaction group holding the
//! entries it posted. Groups are stored with the ledger and never modified
//! after commit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::cash::DenominationVector;
use super::ids::{AccountId, EntryId, GroupId, OwnerId};
use super::money::Money;

/// Kind of a single ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
    Withdrawal,
    Transfer,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
            Self::Withdrawal => write!(f, "Withdrawal"),
            Self::Transfer => write!(f, "Transfer"),
        }
    }
}

/// Operation that produced a transaction group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Deposit,
    Withdrawal,
    Transfer,
    Settlement,
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "Deposit"),
            Self::Withdrawal => write!(f, "Withdrawal"),
            Self::Transfer => write!(f, "Transfer"),
            Self::Settlement => write!(f, "Settlement"),
        }
    }
}

/// One posting against an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub account_id: AccountId,
    /// Signed amount; outflows are negative
    pub amount: Money,
    #[serde(default)]
    pub description: String,
}

impl LedgerEntry {
    pub fn new(
        kind: EntryKind,
        account_id: AccountId,
        amount: Money,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            kind,
            account_id,
            amount,
            description: description.into(),
        }
    }
}

/// Audit root grouping the entries of one operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionGroup {
    pub id: GroupId,
    pub owner_id: OwnerId,
    pub kind: GroupKind,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    /// Physical cash that entered or left the ledger
    #[serde(default)]
    pub cash: DenominationVector,
    pub entries: Vec<LedgerEntry>,
}

impl TransactionGroup {
    pub fn new(owner_id: OwnerId, kind: GroupKind, description: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(),
            owner_id,
            kind,
            created_at: Utc::now(),
            description: description.into(),
            cash: DenominationVector::new(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: LedgerEntry) {
        self.entries.push(entry);
    }

    /// Sum of all entry amounts
    pub fn net_amount(&self) -> Money {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Sum of entries of one kind
    pub fn total_of(&self, kind: EntryKind) -> Money {
        self.entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_totals() {
        let mut group = TransactionGroup::new(OwnerId::new(), GroupKind::Deposit, "payday");
        let account = AccountId::new();
        group.push(LedgerEntry::new(EntryKind::Expense, account, Money::from_cents(1500), "Rent"));
        group.push(LedgerEntry::new(EntryKind::Income, account, Money::from_cents(8500), ""));

        assert_eq!(group.net_amount(), Money::from_cents(10_000));
        assert_eq!(group.total_of(EntryKind::Expense), Money::from_cents(1500));
        assert_eq!(group.total_of(EntryKind::Withdrawal), Money::zero());
    }

    #[test]
    fn test_serialization() {
        let group = TransactionGroup::new(OwnerId::new(), GroupKind::Transfer, "move");
        let json = serde_json::to_string(&group).unwrap();
        assert!(json.contains("\"transfer\""));
        let back: TransactionGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, group.id);
    }
}
