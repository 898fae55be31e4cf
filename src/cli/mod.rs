//! CLI command handlers
//!
//! This module bridges clap argument parsing with the service layer.
//! Cash is given on the command line as `KEY=COUNT` pairs, e.g. `50=2 0.20=3`.

pub mod account;
pub mod cash;
pub mod expense;
pub mod export;
pub mod history;
pub mod owner;

pub use account::{handle_account_command, AccountCommands};
pub use cash::{
    handle_deposit, handle_settle, handle_transfer, handle_withdraw, DepositArgs, TransferArgs,
    WithdrawArgs,
};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export, ExportArgs, ExportFormat};
pub use history::{handle_history, HistoryArgs};
pub use owner::{handle_owner_command, OwnerCommands};

use std::collections::HashMap;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Percentage};

/// Parse one `KEY=COUNT` argument
pub fn parse_cash_arg(arg: &str) -> Result<(String, i64), String> {
    let (key, count) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=COUNT, got '{}'", arg))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing denomination in '{}'", arg));
    }
    let count = count
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid count in '{}'", arg))?;
    Ok((key.to_string(), count))
}

/// Collect parsed cash arguments into a key → count map; repeated keys add up
pub fn cash_map(pairs: &[(String, i64)]) -> HashMap<String, i64> {
    let mut map = HashMap::new();
    for (key, count) in pairs {
        let total = map.entry(key.clone()).or_insert(0i64);
        *total = total.saturating_add(*count);
    }
    map
}

pub(crate) fn parse_money(input: &str) -> LedgerResult<Money> {
    Money::parse(input).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount '{}'. Use a format like '15.00' or '15': {}",
            input, e
        ))
    })
}

pub(crate) fn parse_percentage(input: &str) -> LedgerResult<Percentage> {
    Percentage::parse(input).map_err(|e| LedgerError::InvalidPercentage(e.to_string()))
}
