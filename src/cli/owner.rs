//! Owner CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_account_list, format_owner_list, DisplayStyle};
use crate::error::LedgerResult;
use crate::services::{AccountService, OwnerService};
use crate::storage::Storage;

use super::parse_money;

/// Owner subcommands
#[derive(Subcommand)]
pub enum OwnerCommands {
    /// Create a new owner (with its Expenses account)
    Create {
        /// Owner name
        name: String,
        /// Capacity of each expenses sub-account (e.g. "1000.00")
        #[arg(short, long)]
        capacity: Option<String>,
    },
    /// List all owners
    List,
    /// Show an owner's accounts and pending cash
    Show {
        /// Owner name or ID (defaults to the selected owner)
        name: Option<String>,
    },
}

/// Handle an owner command
pub fn handle_owner_command(
    storage: &Storage,
    settings: &Settings,
    selected_owner: &str,
    cmd: OwnerCommands,
) -> LedgerResult<()> {
    let service = OwnerService::new(storage);
    let style = DisplayStyle::from_settings(settings);

    match cmd {
        OwnerCommands::Create { name, capacity } => {
            let capacity = match capacity {
                Some(c) => parse_money(&c)?,
                None => settings.default_sub_account_capacity,
            };
            let owner = service.create(&name, capacity)?;

            println!("Created owner: {}", owner.name);
            println!("  Expenses sub-account capacity: {}", style.money(capacity));
            println!("  ID: {}", owner.id);
        }

        OwnerCommands::List => {
            let owners = service.list()?;
            print!("{}", format_owner_list(&owners, &style));
        }

        OwnerCommands::Show { name } => {
            let owner = service.resolve(name.as_deref().unwrap_or(selected_owner))?;
            let pending = service.pending(owner.id)?;
            let accounts = AccountService::new(storage).list(owner.id)?;

            println!("Owner: {}", owner.name);
            println!("  ID: {}", owner.id);
            if pending.is_empty() {
                println!("  Pending cash: none");
            } else {
                println!(
                    "  Pending cash: {} ({})",
                    style.money(pending.total()),
                    pending.vector()
                );
            }
            println!();
            print!("{}", format_account_list(&accounts, &style));
        }
    }

    Ok(())
}
