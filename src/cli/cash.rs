//! Cash-moving CLI commands: deposit, withdraw, transfer and settle

use clap::Args;

use crate::config::settings::Settings;
use crate::display::{
    format_deposit_preview, format_deposit_receipt, format_settlement, format_transfer,
    format_withdrawal, DisplayStyle,
};
use crate::error::LedgerResult;
use crate::models::OwnerId;
use crate::services::{DepositService, TransferService, WithdrawalService};
use crate::storage::Storage;

use super::{cash_map, parse_cash_arg};

/// Arguments of `deposit`
#[derive(Args)]
pub struct DepositArgs {
    /// Notes and coins as KEY=COUNT (e.g. 50=2 20=1 0.50=3)
    #[arg(required = true, value_parser = parse_cash_arg)]
    pub cash: Vec<(String, i64)>,

    /// Show the distribution without applying it
    #[arg(long)]
    pub preview: bool,
}

/// Arguments of `withdraw`
#[derive(Args)]
pub struct WithdrawArgs {
    /// Account name or ID
    pub account: String,

    /// Notes and coins as KEY=COUNT
    #[arg(required = true, value_parser = parse_cash_arg)]
    pub cash: Vec<(String, i64)>,

    /// Description recorded with the withdrawal
    #[arg(short, long)]
    pub description: Option<String>,
}

/// Arguments of `transfer`
#[derive(Args)]
pub struct TransferArgs {
    /// Source account name or ID
    pub from: String,

    /// Destination account name or ID
    pub to: String,

    /// Notes and coins as KEY=COUNT
    #[arg(required = true, value_parser = parse_cash_arg)]
    pub cash: Vec<(String, i64)>,

    /// Description recorded with the transfer
    #[arg(short, long)]
    pub description: Option<String>,
}

/// Handle `deposit`
pub fn handle_deposit(
    storage: &Storage,
    settings: &Settings,
    owner_id: OwnerId,
    args: DepositArgs,
) -> LedgerResult<()> {
    let service = DepositService::new(storage);
    let style = DisplayStyle::from_settings(settings);
    let cash = cash_map(&args.cash);

    if args.preview {
        let preview = service.preview_deposit(owner_id, &cash)?;
        print!("{}", format_deposit_preview(&preview, &style));
        println!("Preview only; nothing was saved.");
    } else {
        let receipt = service.apply_deposit(owner_id, &cash)?;
        print!("{}", format_deposit_receipt(&receipt, &style));
    }

    Ok(())
}

/// Handle `withdraw`
pub fn handle_withdraw(
    storage: &Storage,
    settings: &Settings,
    owner_id: OwnerId,
    args: WithdrawArgs,
) -> LedgerResult<()> {
    let receipt = WithdrawalService::new(storage).withdraw(
        owner_id,
        &args.account,
        &cash_map(&args.cash),
        args.description.as_deref(),
    )?;
    print!(
        "{}",
        format_withdrawal(&receipt, &DisplayStyle::from_settings(settings))
    );
    Ok(())
}

/// Handle `transfer`
pub fn handle_transfer(
    storage: &Storage,
    settings: &Settings,
    owner_id: OwnerId,
    args: TransferArgs,
) -> LedgerResult<()> {
    let receipt = TransferService::new(storage).transfer(
        owner_id,
        &args.from,
        &args.to,
        &cash_map(&args.cash),
        args.description.as_deref(),
    )?;
    print!(
        "{}",
        format_transfer(&receipt, &DisplayStyle::from_settings(settings))
    );
    Ok(())
}

/// Handle `settle`
pub fn handle_settle(
    storage: &Storage,
    settings: &Settings,
    owner_id: OwnerId,
) -> LedgerResult<()> {
    let receipt = DepositService::new(storage).settle_pending(owner_id)?;
    print!(
        "{}",
        format_settlement(&receipt, &DisplayStyle::from_settings(settings))
    );
    Ok(())
}
