//! Unit-of-work transactions over the ledger document
//!
//! A [`LedgerTx`] holds the store's writer lock and a private copy of the
//! ledger. Every read and write an operation performs goes through that
//! copy. [`LedgerTx::commit`] checks the ledger invariants, writes the
//! document atomically and only then publishes it; dropping the handle
//! without committing discards everything.

use std::ops::{Deref, DerefMut};
use std::sync::MutexGuard;

use tracing::{debug, info};

use super::file_io::write_json_atomic;
use super::ledger_data::{LedgerData, LEDGER_SCHEMA_VERSION};
use super::Storage;
use crate::error::LedgerResult;

/// An open ledger transaction
pub struct LedgerTx<'a> {
    storage: &'a Storage,
    _writer: MutexGuard<'a, ()>,
    staged: LedgerData,
    committed: bool,
}

impl<'a> LedgerTx<'a> {
    pub(super) fn new(
        storage: &'a Storage,
        writer: MutexGuard<'a, ()>,
        staged: LedgerData,
    ) -> Self {
        Self {
            storage,
            _writer: writer,
            staged,
            committed: false,
        }
    }

    /// Persist the staged ledger and make it visible to readers
    ///
    /// Fails without touching disk if the staged state breaks an invariant.
    pub fn commit(mut self) -> LedgerResult<()> {
        let mut data = std::mem::take(&mut self.staged);
        data.schema_version = LEDGER_SCHEMA_VERSION;
        data.check_integrity()?;

        write_json_atomic(self.storage.paths().ledger_file(), &data)?;
        self.storage.publish(data)?;
        self.committed = true;

        info!("ledger transaction committed");
        Ok(())
    }

    /// Discard every staged change
    pub fn rollback(self) {}
}

impl Deref for LedgerTx<'_> {
    type Target = LedgerData;

    fn deref(&self) -> &Self::Target {
        &self.staged
    }
}

impl DerefMut for LedgerTx<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.staged
    }
}

impl Drop for LedgerTx<'_> {
    fn drop(&mut self) {
        if !self.committed {
            debug!("ledger transaction rolled back");
        }
    }
}
