//! Recurring expense CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::DisplayStyle;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{ExpenseFrequency, OwnerId};
use crate::services::ExpenseService;
use crate::storage::Storage;

use super::parse_money;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Add a recurring expense reserved from every deposit
    Add {
        /// Expense name
        name: String,
        /// Amount per period (e.g. "15.00")
        amount: String,
        /// Billing frequency (monthly, annual)
        #[arg(short, long, default_value = "monthly")]
        frequency: String,
    },
    /// List recurring expenses
    List,
    /// Remove a recurring expense
    Remove {
        /// Expense name or ID
        expense: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    owner_id: OwnerId,
    cmd: ExpenseCommands,
) -> LedgerResult<()> {
    let service = ExpenseService::new(storage);
    let style = DisplayStyle::from_settings(settings);

    match cmd {
        ExpenseCommands::Add {
            name,
            amount,
            frequency,
        } => {
            let frequency = ExpenseFrequency::parse(&frequency).ok_or_else(|| {
                LedgerError::Validation(format!(
                    "Invalid frequency: '{}'. Valid frequencies: monthly, annual",
                    frequency
                ))
            })?;
            let amount = parse_money(&amount)?;

            let expense = service.add(owner_id, &name, amount, frequency)?;

            println!("Added expense: {}", expense.name);
            println!("  {} {}", style.money(expense.amount), expense.frequency);
            println!("  Reserved per deposit: {}", style.money(expense.per_deposit()));
        }

        ExpenseCommands::List => {
            let expenses = service.list(owner_id)?;
            if expenses.is_empty() {
                println!("No recurring expenses.");
                return Ok(());
            }
            for expense in &expenses {
                println!(
                    "  {:<20} {:>12} {:<8} -> {} per deposit",
                    expense.name,
                    style.money(expense.amount),
                    expense.frequency.to_string(),
                    style.money(expense.per_deposit())
                );
            }
            println!(
                "Reserved per deposit: {}",
                style.money(service.reserve_per_deposit(owner_id)?)
            );
        }

        ExpenseCommands::Remove { expense } => {
            let removed = service.remove(owner_id, &expense)?;
            println!("Removed expense: {}", removed.name);
        }
    }

    Ok(())
}
