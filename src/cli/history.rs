//! History CLI command

use clap::Args;
use std::collections::HashMap;

use crate::config::settings::Settings;
use crate::display::{format_audit_log, format_history, DisplayStyle};
use crate::error::LedgerResult;
use crate::models::OwnerId;
use crate::services::{AccountService, HistoryService};
use crate::storage::Storage;

/// Arguments of `history`
#[derive(Args)]
pub struct HistoryArgs {
    /// Number of transaction groups to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Show the audit log instead of the owner's transactions
    #[arg(long)]
    pub audit: bool,
}

/// Handle `history`
pub fn handle_history(
    storage: &Storage,
    settings: &Settings,
    owner_id: OwnerId,
    args: HistoryArgs,
) -> LedgerResult<()> {
    let history = HistoryService::new(storage);
    if args.audit {
        print!("{}", format_audit_log(&history.audit_trail(args.limit)?));
        return Ok(());
    }

    let groups = history.recent(owner_id, args.limit)?;
    let account_names: HashMap<_, _> = AccountService::new(storage)
        .list(owner_id)?
        .into_iter()
        .map(|s| (s.account.id, s.account.name))
        .collect();

    print!(
        "{}",
        format_history(&groups, &account_names, &DisplayStyle::from_settings(settings))
    );
    Ok(())
}
