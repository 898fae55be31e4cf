//! Owner model
//!
//! The owner is the person whose money the ledger tracks. It holds the
//! pending cash store: notes received but not yet handed to a sub-account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cash::CashStore;
use super::ids::{AccountId, OwnerId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,

    pub name: String,

    /// The owner's expenses sink account
    pub expenses_account_id: AccountId,

    /// Undivided physical cash; created on first use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pending: Option<CashStore>,

    pub created_at: DateTime<Utc>,
}

impl Owner {
    pub fn new(name: impl Into<String>, expenses_account_id: AccountId) -> Self {
        Self::with_id(OwnerId::new(), name, expenses_account_id)
    }

    /// Create an owner with a pre-allocated id (the expenses account needs
    /// the owner id before the owner exists)
    pub fn with_id(id: OwnerId, name: impl Into<String>, expenses_account_id: AccountId) -> Self {
        Self {
            id,
            name: name.into(),
            expenses_account_id,
            pending: None,
            created_at: Utc::now(),
        }
    }

    /// Pending cash, if any has ever been received
    pub fn pending(&self) -> Option<&CashStore> {
        self.pending.as_ref()
    }

    /// Pending cash store, created empty on first access
    pub fn pending_mut(&mut self) -> &mut CashStore {
        self.pending.get_or_insert_with(CashStore::new)
    }

    /// A copy of the pending store (empty if never created)
    pub fn pending_snapshot(&self) -> CashStore {
        self.pending.clone().unwrap_or_default()
    }
}
