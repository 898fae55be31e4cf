//! Sub-account model
//!
//! A sub-account ("subcuenta") is a capacity-bounded cell inside an account.
//! It tracks a logical running total and owns the physical cash backing it.
//! The physical value may lag behind the logical total (the difference is
//! `pending_logical`) but never exceeds it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cash::{CashStore, DenominationVector};
use super::ids::{AccountId, SubAccountId};
use super::money::Money;
use crate::error::{LedgerError, LedgerResult};

/// A capacity-bounded, cash-backed cell of an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSubAccount {
    pub id: SubAccountId,

    /// Parent account
    pub account_id: AccountId,

    pub name: String,

    /// Creation order within the parent account
    pub position: u32,

    /// Logical running total
    pub total: Money,

    /// Maximum logical total
    pub capacity: Money,

    /// True iff `total == capacity`
    pub is_filled: bool,

    /// Logical value not yet backed by physical cash
    pub pending_logical: Money,

    /// Physical cash backing the total
    pub cash: CashStore,

    pub created_at: DateTime<Utc>,
}

impl LedgerSubAccount {
    /// Create an empty sub-account
    pub fn new(
        account_id: AccountId,
        name: impl Into<String>,
        position: u32,
        capacity: Money,
    ) -> Self {
        Self {
            id: SubAccountId::new(),
            account_id,
            name: name.into(),
            position,
            total: Money::zero(),
            capacity,
            is_filled: false,
            pending_logical: Money::zero(),
            cash: CashStore::new(),
            created_at: Utc::now(),
        }
    }

    /// Logical room left before the cap
    pub fn remaining_capacity(&self) -> Money {
        self.capacity - self.total
    }

    /// Increase the logical total; returns an error if it would pass the cap
    pub fn credit(&mut self, amount: Money) -> LedgerResult<()> {
        if amount.is_negative() || amount > self.remaining_capacity() {
            return Err(LedgerError::Invariant(format!(
                "cannot credit {} to sub-account '{}' with {} of room",
                amount,
                self.name,
                self.remaining_capacity()
            )));
        }
        self.total += amount;
        self.pending_logical += amount;
        self.refresh_filled();
        Ok(())
    }

    /// Back the logical total with cash offered from `pool`
    ///
    /// Inserts greedily up to `min(pending_logical, pool value)`; whatever is
    /// taken is removed from `pool`. Returns the value inserted.
    pub fn back_with(&mut self, pool: &mut DenominationVector) -> Money {
        let target = self.pending_logical.min(pool.total_value());
        if !target.is_positive() {
            return Money::zero();
        }
        let inserted = self.cash.insert(pool, target);
        self.pending_logical -= inserted;
        inserted
    }

    /// Remove physical cash, lowering the logical total by the same value
    pub fn take_cash(&mut self, requested: &DenominationVector) -> (DenominationVector, Money) {
        let (extracted, value) = self.cash.extract(requested);
        self.total -= value;
        self.refresh_filled();
        (extracted, value)
    }

    /// Check the sub-account's own invariants
    pub fn check_invariants(&self) -> LedgerResult<()> {
        if self.cash.total() > self.total {
            return Err(LedgerError::Invariant(format!(
                "sub-account '{}' holds {} of cash against a total of {}",
                self.name,
                self.cash.total(),
                self.total
            )));
        }
        if self.total > self.capacity || self.total.is_negative() {
            return Err(LedgerError::Invariant(format!(
                "sub-account '{}' total {} is outside 0..{}",
                self.name, self.total, self.capacity
            )));
        }
        if self.pending_logical != self.total - self.cash.total() {
            return Err(LedgerError::Invariant(format!(
                "sub-account '{}' pending {} does not match total {} minus cash {}",
                self.name,
                self.pending_logical,
                self.total,
                self.cash.total()
            )));
        }
        Ok(())
    }

    fn refresh_filled(&mut self) {
        self.is_filled = self.total == self.capacity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Denomination;

    fn sub(capacity_cents: i64) -> LedgerSubAccount {
        LedgerSubAccount::new(AccountId::new(), "Ahorro #1", 0, Money::from_cents(capacity_cents))
    }

    #[test]
    fn test_credit_fills_to_capacity() {
        let mut s = sub(10_000);
        s.credit(Money::from_cents(4_000)).unwrap();
        assert!(!s.is_filled);
        assert_eq!(s.remaining_capacity(), Money::from_cents(6_000));
        assert_eq!(s.pending_logical, Money::from_cents(4_000));

        s.credit(Money::from_cents(6_000)).unwrap();
        assert!(s.is_filled);
        assert!(s.credit(Money::from_cents(1)).is_err());
        s.check_invariants().unwrap();
    }

    #[test]
    fn test_back_with_never_exceeds_logical_total() {
        let mut s = sub(10_000);
        s.credit(Money::from_cents(3_000)).unwrap();

        let mut pool = DenominationVector::from_entries([(Denomination::Twenty, 3)]);
        let inserted = s.back_with(&mut pool);

        // one 20 fits into 30, a second would overshoot
        assert_eq!(inserted, Money::from_cents(2_000));
        assert_eq!(pool.count(Denomination::Twenty), 2);
        assert_eq!(s.pending_logical, Money::from_cents(1_000));
        assert!(s.cash.total() <= s.total);
        s.check_invariants().unwrap();
    }

    #[test]
    fn test_take_cash_lowers_total() {
        let mut s = sub(10_000);
        s.credit(Money::from_cents(10_000)).unwrap();
        let mut pool = DenominationVector::from_entries([(Denomination::Fifty, 2)]);
        s.back_with(&mut pool);
        assert!(s.is_filled);

        let request = DenominationVector::from_entries([(Denomination::Fifty, 1)]);
        let (taken, value) = s.take_cash(&request);
        assert_eq!(taken, request);
        assert_eq!(value, Money::from_cents(5_000));
        assert_eq!(s.total, Money::from_cents(5_000));
        assert!(!s.is_filled);
        s.check_invariants().unwrap();
    }
}
