//! Storage layer for cash-envelope
//!
//! The ledger is one JSON document written with atomic replace. Mutations go
//! through [`LedgerTx`] handles obtained from [`Storage::begin`]; reads use
//! [`Storage::snapshot`].

pub mod file_io;
pub mod init;
pub mod ledger_data;
pub mod transaction;

pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use ledger_data::{LedgerData, LEDGER_SCHEMA_VERSION};
pub use transaction::LedgerTx;

use std::sync::{Mutex, RwLock};

use serde::Serialize;
use tracing::{debug, warn};

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::models::TransactionGroup;

/// Main storage coordinator
pub struct Storage {
    paths: LedgerPaths,
    data: RwLock<LedgerData>,
    writer: Mutex<()>,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance with an empty in-memory ledger
    pub fn new(paths: LedgerPaths) -> LedgerResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            paths,
            data: RwLock::new(LedgerData::default()),
            writer: Mutex::new(()),
        })
    }

    /// Create a Storage instance and load the ledger from disk
    pub fn open(paths: LedgerPaths) -> LedgerResult<Self> {
        let storage = Self::new(paths)?;
        storage.load()?;
        Ok(storage)
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// (Re)load the ledger from disk
    pub fn load(&self) -> LedgerResult<()> {
        let loaded: LedgerData = read_json(self.paths.ledger_file())?;
        if loaded.schema_version > LEDGER_SCHEMA_VERSION {
            return Err(LedgerError::Storage(format!(
                "ledger schema version {} is newer than supported version {}",
                loaded.schema_version, LEDGER_SCHEMA_VERSION
            )));
        }
        debug!(owners = loaded.owners().len(), "ledger loaded");
        self.publish(loaded)
    }

    /// A consistent copy of the committed ledger
    pub fn snapshot(&self) -> LedgerResult<LedgerData> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.clone())
    }

    /// Open a transaction; blocks while another one is open
    pub fn begin(&self) -> LedgerResult<LedgerTx<'_>> {
        let writer = self
            .writer
            .lock()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire writer lock: {}", e)))?;
        let staged = self.snapshot()?;
        Ok(LedgerTx::new(self, writer, staged))
    }

    /// Check if the store has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// The audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    // Runs after commit: failures are logged, not returned.
    fn append_audit(&self, entry: &AuditEntry) {
        if let Err(e) = self.audit.log(entry) {
            warn!(
                error = %e,
                entity = %entry.entity_type,
                id = %entry.entity_id,
                "failed to append audit entry"
            );
        }
    }

    /// Record a created entity in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.append_audit(&AuditEntry::create(entity_type, entity_id, entity_name, entity));
    }

    /// Record a modified entity, with a field diff, in the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.append_audit(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ));
    }

    /// Record a removed entity in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.append_audit(&AuditEntry::delete(entity_type, entity_id, entity_name, entity));
    }

    /// Record a committed transaction group in the audit log
    pub fn log_posted(&self, group: &TransactionGroup, owner_name: &str) {
        self.append_audit(&AuditEntry::posted(group, owner_name));
    }

    pub(crate) fn publish(&self, data: LedgerData) -> LedgerResult<()> {
        let mut current = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *current = data;
        Ok(())
    }
}
