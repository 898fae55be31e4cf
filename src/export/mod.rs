//! Ledger export
//!
//! - CSV: ledger entries (spreadsheet-compatible)
//! - JSON: one owner's full ledger, machine-readable
//! - YAML: the same document, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_entries_csv;
pub use json::{export_json, read_json_export, ExportMetadata, LedgerExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_yaml, read_yaml_export};
