//! Owner service
//!
//! Owners are created together with their "Expenses" sink account.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{CashStore, Money, Owner, OwnerId};
use crate::storage::Storage;

/// Service for owner management
pub struct OwnerService<'a> {
    storage: &'a Storage,
}

/// An owner with computed balances
#[derive(Debug, Clone)]
pub struct OwnerSummary {
    pub owner: Owner,
    /// Cash not yet handed to any sub-account
    pub pending: CashStore,
    /// Number of accounts, expenses sink included
    pub account_count: usize,
    /// Sum of all logical balances
    pub logical_total: Money,
}

impl<'a> OwnerService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create an owner; its expenses sink gets `sink_capacity` per sub-account
    pub fn create(&self, name: &str, sink_capacity: Money) -> LedgerResult<Owner> {
        if !sink_capacity.is_positive() {
            return Err(LedgerError::Validation(
                "Sub-account capacity must be positive".into(),
            ));
        }

        let mut tx = self.storage.begin()?;
        let owner_id = tx.create_owner(name, sink_capacity)?;
        let owner = tx.owner(owner_id)?.clone();
        tx.commit()?;

        info!(owner = %owner.name, "owner created");
        self.storage.log_create(
            EntityType::Owner,
            owner.id.to_string(),
            Some(owner.name.clone()),
            &owner,
        );

        Ok(owner)
    }

    /// Find an owner by name or full id
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Owner>> {
        let data = self.storage.snapshot()?;
        if let Some(owner) = data.owner_by_name(identifier) {
            return Ok(Some(owner.clone()));
        }
        if let Ok(id) = identifier.parse::<OwnerId>() {
            return Ok(data.owner(id).ok().cloned());
        }
        Ok(None)
    }

    /// Like [`find`](Self::find) but a missing owner is an error
    pub fn resolve(&self, identifier: &str) -> LedgerResult<Owner> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::owner_not_found(identifier))
    }

    /// All owners with their balances
    pub fn list(&self) -> LedgerResult<Vec<OwnerSummary>> {
        let data = self.storage.snapshot()?;
        let mut summaries: Vec<_> = data
            .owners()
            .iter()
            .map(|owner| OwnerSummary {
                pending: owner.pending_snapshot(),
                account_count: data.accounts_of(owner.id).len(),
                logical_total: data.logical_total(owner.id),
                owner: owner.clone(),
            })
            .collect();
        summaries.sort_by(|a, b| a.owner.name.cmp(&b.owner.name));
        Ok(summaries)
    }

    /// The owner's pending cash
    pub fn pending(&self, owner_id: OwnerId) -> LedgerResult<CashStore> {
        let data = self.storage.snapshot()?;
        Ok(data.owner(owner_id)?.pending_snapshot())
    }
}
