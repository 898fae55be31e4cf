//! Audit logging for cash-envelope
//!
//! Every committed operation is appended to a line-delimited JSON log with
//! the entity it touched and, for updates, a before/after diff.
//!
//! - `AuditEntry`: one log line (timestamp, operation, entity, values)
//! - `AuditLogger`: appends and reads the JSONL file
//! - `generate_diff`: top-level field diff between two JSON values

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
