//! Append-only audit log
//!
//! Each entry is written as a single JSON line and flushed immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{LedgerError, LedgerResult};

use super::entry::AuditEntry;

/// Writes audit entries to a JSONL file
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry
    pub fn log(&self, entry: &AuditEntry) -> LedgerResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| LedgerError::Io(format!("Failed to open audit log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| LedgerError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| LedgerError::Io(format!("Failed to write audit entry: {}", e)))?;

        file.flush()
            .map_err(|e| LedgerError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Read all entries, oldest first
    pub fn read_all(&self) -> LedgerResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| LedgerError::Io(format!("Failed to open audit log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                LedgerError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                LedgerError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            entries.push(entry);
        }

        Ok(entries)
    }

    /// The most recent `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> LedgerResult<Vec<AuditEntry>> {
        let all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries[start..].to_vec())
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn owner_entry(name: &str) -> AuditEntry {
        AuditEntry::create(
            EntityType::Owner,
            format!("own-{}", name),
            Some(name.to_string()),
            &json!({ "name": name }),
        )
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        logger.log(&owner_entry("ana")).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::Owner);
    }

    #[test]
    fn test_read_recent() {
        let (logger, _temp) = create_test_logger();
        for name in ["ana", "luis", "marta"] {
            logger.log(&owner_entry(name)).unwrap();
        }

        let recent = logger.read_recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].entity_name.as_deref(), Some("luis"));
        assert_eq!(recent[1].entity_name.as_deref(), Some("marta"));
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let (logger, _temp) = create_test_logger();
        assert!(logger.read_all().unwrap().is_empty());
        assert!(!logger.path().exists());
    }

    #[test]
    fn test_corrupt_line_reports_position() {
        let (logger, _temp) = create_test_logger();
        logger.log(&owner_entry("ana")).unwrap();
        let mut file = OpenOptions::new().append(true).open(logger.path()).unwrap();
        writeln!(file, "{{broken").unwrap();

        let err = logger.read_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
