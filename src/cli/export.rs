//! Export CLI command

use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::error::{LedgerError, LedgerResult};
use crate::export::{export_entries_csv, export_json, export_yaml};
use crate::models::OwnerId;
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV (ledger entries only)
    Csv,
    /// JSON (full ledger of the owner)
    Json,
    /// YAML (full ledger, human-readable)
    Yaml,
}

/// Arguments of `export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ExportFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle `export`
pub fn handle_export(storage: &Storage, owner_id: OwnerId, args: ExportArgs) -> LedgerResult<()> {
    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                LedgerError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write_export(storage, owner_id, args.format, &mut writer)?;
            writer.flush()?;
            eprintln!("Exported to: {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_export(storage, owner_id, args.format, &mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn write_export<W: Write>(
    storage: &Storage,
    owner_id: OwnerId,
    format: ExportFormat,
    writer: &mut W,
) -> LedgerResult<()> {
    match format {
        ExportFormat::Csv => {
            export_entries_csv(storage, owner_id, &mut *writer)?;
        }
        ExportFormat::Json => {
            export_json(storage, owner_id, &mut *writer, true)?;
            writeln!(writer)?;
        }
        ExportFormat::Yaml => export_yaml(storage, owner_id, writer)?,
    }
    Ok(())
}
