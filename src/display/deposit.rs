//! Deposit, withdrawal and transfer output

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::DisplayStyle;
use crate::engine::CashChange;
use crate::models::CashStore;
use crate::services::{
    DepositPreview, DepositReceipt, SettlementReceipt, TransferReceipt, WithdrawalReceipt,
};

#[derive(Tabled)]
struct ImpactRow {
    #[tabled(rename = "Account")]
    name: String,
    #[tabled(rename = "Before")]
    before: String,
    #[tabled(rename = "Change")]
    delta: String,
    #[tabled(rename = "After")]
    after: String,
}

#[derive(Tabled)]
struct CashChangeRow {
    #[tabled(rename = "Sub-account")]
    name: String,
    #[tabled(rename = "Received")]
    inserted: String,
    #[tabled(rename = "Now holds")]
    after: String,
}

fn cash_change_table(changes: &[CashChange], style: &DisplayStyle) -> String {
    if changes.is_empty() {
        return "No cash was placed in sub-accounts.\n".to_string();
    }
    let rows: Vec<CashChangeRow> = changes
        .iter()
        .map(|c| CashChangeRow {
            name: c.name.clone(),
            inserted: style.money(c.inserted),
            after: c.after.to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::single(1)).with(Alignment::right()));
    format!("{}\n", table)
}

fn pending_line(label: &str, pending: &CashStore, style: &DisplayStyle) -> String {
    if pending.is_empty() {
        format!("{}: none\n", label)
    } else {
        format!(
            "{}: {} ({})\n",
            label,
            style.money(pending.total()),
            pending.vector()
        )
    }
}

/// Format what a deposit would do
pub fn format_deposit_preview(preview: &DepositPreview, style: &DisplayStyle) -> String {
    let plan = &preview.plan;
    let mut output = String::new();

    output.push_str(&format!(
        "Deposit:  {} ({})\n",
        style.money(plan.total_deposit),
        preview.cash
    ));
    output.push_str(&format!("Expenses: {}\n", style.money(plan.total_expenses)));
    for line in &plan.expense_lines {
        output.push_str(&format!("  {:<20} {}\n", line.name, style.money(line.amount)));
    }
    output.push_str(&format!(
        "To distribute: {}\n\n",
        style.money(plan.remaining_after_expenses)
    ));

    let rows: Vec<ImpactRow> = preview
        .impacts
        .iter()
        .map(|i| ImpactRow {
            name: i.name.clone(),
            before: style.money(i.before),
            delta: style.money(i.delta()),
            after: style.money(i.after),
        })
        .collect();
    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    output.push_str(&table.to_string());
    output.push('\n');

    output
}

/// Format an applied deposit
pub fn format_deposit_receipt(receipt: &DepositReceipt, style: &DisplayStyle) -> String {
    let plan = &receipt.plan;
    let mut output = String::new();

    output.push_str(&format!(
        "Deposited {} (group {})\n",
        style.money(plan.total_deposit),
        receipt.group_id
    ));
    if plan.total_expenses.is_positive() {
        output.push_str(&format!(
            "  Reserved for expenses: {}\n",
            style.money(plan.total_expenses)
        ));
    }
    for share in plan.shares.iter().filter(|s| s.amount.is_positive()) {
        output.push_str(&format!(
            "  {:<20} {:>12}\n",
            share.name,
            style.money(share.amount)
        ));
    }
    output.push('\n');
    output.push_str(&cash_change_table(&receipt.cash_changes, style));
    output.push_str(&pending_line("Pending cash", &receipt.pending_after, style));

    output
}

/// Format the result of settling pending cash
pub fn format_settlement(receipt: &SettlementReceipt, style: &DisplayStyle) -> String {
    let mut output = String::new();
    match receipt.group_id {
        Some(group_id) => {
            output.push_str(&format!("Settled pending cash (group {})\n", group_id));
            output.push_str(&cash_change_table(&receipt.cash_changes, style));
        }
        None => output.push_str("Nothing to settle.\n"),
    }
    output.push_str(&pending_line("Pending cash", &receipt.pending_after, style));
    output
}

/// Format a withdrawal
pub fn format_withdrawal(receipt: &WithdrawalReceipt, style: &DisplayStyle) -> String {
    let mut output = format!(
        "Withdrew {} ({}) (group {})\n",
        style.money(receipt.value),
        receipt.extracted,
        receipt.group_id
    );
    for part in &receipt.breakdown {
        output.push_str(&format!(
            "  {:<20} {:>12}  {}\n",
            part.name,
            style.money(part.value),
            part.extracted
        ));
    }
    output
}

/// Format a transfer
pub fn format_transfer(receipt: &TransferReceipt, style: &DisplayStyle) -> String {
    let mut output = format!(
        "Transferred {} ({}) (group {})\n",
        style.money(receipt.amount),
        receipt.moved,
        receipt.group_id
    );
    output.push_str(&cash_change_table(&receipt.cash_changes, style));
    output
}
