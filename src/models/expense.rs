//! Recurring expense model
//!
//! Recurring expenses are reserved out of every deposit before the
//! percentage split. Annual expenses reserve a twelfth of their amount.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ExpenseId, OwnerId};
use super::money::Money;

/// How often an expense falls due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseFrequency {
    #[default]
    Monthly,
    Annual,
}

impl ExpenseFrequency {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "monthly" | "month" | "m" => Some(Self::Monthly),
            "annual" | "yearly" | "year" | "y" => Some(Self::Annual),
            _ => None,
        }
    }
}

impl fmt::Display for ExpenseFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => write!(f, "Monthly"),
            Self::Annual => write!(f, "Annual"),
        }
    }
}

/// An expense reserved from each deposit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringExpense {
    pub id: ExpenseId,
    pub owner_id: OwnerId,
    pub name: String,
    pub amount: Money,
    pub frequency: ExpenseFrequency,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl RecurringExpense {
    pub fn new(
        owner_id: OwnerId,
        name: impl Into<String>,
        amount: Money,
        frequency: ExpenseFrequency,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            owner_id,
            name: name.into(),
            amount,
            frequency,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn monthly(owner_id: OwnerId, name: impl Into<String>, amount: Money) -> Self {
        Self::new(owner_id, name, amount, ExpenseFrequency::Monthly)
    }

    pub fn annual(owner_id: OwnerId, name: impl Into<String>, amount: Money) -> Self {
        Self::new(owner_id, name, amount, ExpenseFrequency::Annual)
    }

    /// Amount reserved from a single deposit, rounded to the cent
    pub fn per_deposit(&self) -> Money {
        if !self.active {
            return Money::zero();
        }
        match self.frequency {
            ExpenseFrequency::Monthly => self.amount,
            ExpenseFrequency::Annual => self.amount.div_rounded(12),
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_deposit() {
        let owner = OwnerId::new();
        let rent = RecurringExpense::monthly(owner, "Rent", Money::from_cents(1500));
        assert_eq!(rent.per_deposit(), Money::from_cents(1500));

        let insurance = RecurringExpense::annual(owner, "Insurance", Money::from_cents(10_000));
        assert_eq!(insurance.per_deposit(), Money::from_cents(833));

        let mut gym = RecurringExpense::monthly(owner, "Gym", Money::from_cents(3000));
        gym.deactivate();
        assert_eq!(gym.per_deposit(), Money::zero());
    }

    #[test]
    fn test_frequency_parse() {
        assert_eq!(ExpenseFrequency::parse("Monthly"), Some(ExpenseFrequency::Monthly));
        assert_eq!(ExpenseFrequency::parse("yearly"), Some(ExpenseFrequency::Annual));
        assert_eq!(ExpenseFrequency::parse("weekly"), None);
    }
}
