//! Account CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_account_details, format_account_list, DisplayStyle};
use crate::error::LedgerResult;
use crate::models::{OwnerId, Percentage};
use crate::services::AccountService;
use crate::storage::Storage;

use super::{parse_money, parse_percentage};

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Share of each deposit (e.g. "30" or "33.33%")
        #[arg(short, long, default_value = "0")]
        percent: String,
        /// Receive whatever the fixed shares leave over
        #[arg(long)]
        remainder: bool,
        /// Capacity of each sub-account (e.g. "1000.00")
        #[arg(short, long)]
        capacity: Option<String>,
    },
    /// List accounts with balances
    List,
    /// Show an account and its sub-accounts
    Show {
        /// Account name or ID
        account: String,
    },
    /// Change an account's share of each deposit
    SetPercent {
        /// Account name or ID
        account: String,
        /// New share (e.g. "25")
        percent: String,
    },
}

/// Handle an account command
pub fn handle_account_command(
    storage: &Storage,
    settings: &Settings,
    owner_id: OwnerId,
    cmd: AccountCommands,
) -> LedgerResult<()> {
    let service = AccountService::new(storage);
    let style = DisplayStyle::from_settings(settings);

    match cmd {
        AccountCommands::Create {
            name,
            percent,
            remainder,
            capacity,
        } => {
            let percentage = if remainder {
                Percentage::zero()
            } else {
                parse_percentage(&percent)?
            };
            let capacity = match capacity {
                Some(c) => parse_money(&c)?,
                None => settings.default_sub_account_capacity,
            };

            let account = service.create(owner_id, &name, percentage, remainder, capacity)?;

            println!("Created account: {}", account.name);
            if account.is_remainder {
                println!("  Share: remainder");
            } else {
                println!("  Share: {}", account.percentage);
            }
            println!(
                "  Sub-account capacity: {}",
                style.money(account.sub_account_capacity)
            );
            println!("  ID: {}", account.id);
        }

        AccountCommands::List => {
            let summaries = service.list(owner_id)?;
            print!("{}", format_account_list(&summaries, &style));
        }

        AccountCommands::Show { account } => {
            let (account, subs) = service.sub_accounts(owner_id, &account)?;
            print!("{}", format_account_details(&account, &subs, &style));
        }

        AccountCommands::SetPercent { account, percent } => {
            let percentage = parse_percentage(&percent)?;
            let updated = service.set_percentage(owner_id, &account, percentage)?;
            println!("{} now receives {}", updated.name, updated.percentage);
        }
    }

    Ok(())
}
