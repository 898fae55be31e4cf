//! Recurring expense service

use tracing::info;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{ExpenseFrequency, ExpenseId, Money, OwnerId, RecurringExpense};
use crate::storage::Storage;

/// Service for recurring expenses
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a recurring expense reserved from every deposit
    pub fn add(
        &self,
        owner_id: OwnerId,
        name: &str,
        amount: Money,
        frequency: ExpenseFrequency,
    ) -> LedgerResult<RecurringExpense> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("Expense name cannot be empty".into()));
        }
        if !amount.is_positive() {
            return Err(LedgerError::Validation(format!(
                "Expense amount must be positive, got {}",
                amount
            )));
        }

        let expense = RecurringExpense::new(owner_id, name, amount, frequency);
        let mut tx = self.storage.begin()?;
        tx.insert_expense(expense.clone())?;
        tx.commit()?;

        info!(expense = %expense.name, amount = %expense.amount, "expense added");
        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.name.clone()),
            &expense,
        );

        Ok(expense)
    }

    /// Every expense of an owner in creation order
    pub fn list(&self, owner_id: OwnerId) -> LedgerResult<Vec<RecurringExpense>> {
        let data = self.storage.snapshot()?;
        data.owner(owner_id)?;
        Ok(data.expenses_of(owner_id).into_iter().cloned().collect())
    }

    /// Amount every deposit reserves for expenses
    pub fn reserve_per_deposit(&self, owner_id: OwnerId) -> LedgerResult<Money> {
        Ok(self
            .list(owner_id)?
            .iter()
            .map(RecurringExpense::per_deposit)
            .sum())
    }

    /// Remove an expense by name or full id
    pub fn remove(&self, owner_id: OwnerId, identifier: &str) -> LedgerResult<RecurringExpense> {
        let mut tx = self.storage.begin()?;
        let id = match tx.expense_by_name(owner_id, identifier) {
            Some(expense) => expense.id,
            None => identifier
                .parse::<ExpenseId>()
                .ok()
                .filter(|id| tx.expenses_of(owner_id).iter().any(|e| e.id == *id))
                .ok_or_else(|| LedgerError::expense_not_found(identifier))?,
        };
        let removed = tx.remove_expense(id)?;
        tx.commit()?;

        info!(expense = %removed.name, "expense removed");
        self.storage.log_delete(
            EntityType::Expense,
            removed.id.to_string(),
            Some(removed.name.clone()),
            &removed,
        );

        Ok(removed)
    }
}
