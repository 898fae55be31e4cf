//! Owner and account display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::DisplayStyle;
use crate::models::{AccountRole, LedgerAccount, LedgerSubAccount, Money};
use crate::services::{AccountSummary, OwnerSummary};

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "Account")]
    name: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Cash")]
    cash: String,
    #[tabled(rename = "Awaiting cash")]
    awaiting: String,
    #[tabled(rename = "Subs")]
    subs: usize,
}

#[derive(Tabled)]
struct SubAccountRow {
    #[tabled(rename = "Sub-account")]
    name: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
    #[tabled(rename = "Awaiting cash")]
    awaiting: String,
    #[tabled(rename = "Notes and coins")]
    cash: String,
}

#[derive(Tabled)]
struct OwnerRow {
    #[tabled(rename = "Owner")]
    name: String,
    #[tabled(rename = "Accounts")]
    accounts: usize,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Pending cash")]
    pending: String,
}

fn share_label(account: &LedgerAccount) -> String {
    match account.role() {
        AccountRole::Share => account.percentage.to_string(),
        AccountRole::Remainder => "remainder".to_string(),
        AccountRole::Ignored => "expenses".to_string(),
    }
}

/// Format an owner's accounts with balances as a table
pub fn format_account_list(summaries: &[AccountSummary], style: &DisplayStyle) -> String {
    if summaries.is_empty() {
        return "No accounts found.\n".to_string();
    }

    let rows: Vec<AccountRow> = summaries
        .iter()
        .map(|s| AccountRow {
            name: s.account.name.clone(),
            share: share_label(&s.account),
            balance: style.money(s.total),
            cash: style.money(s.cash.total_value()),
            awaiting: style.money(s.pending_logical),
            subs: s.sub_account_count,
        })
        .collect();
    let total: Money = summaries.iter().map(|s| s.total).sum();

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));

    format!("{}\nTotal: {}\n", table, style.money(total))
}

/// Format one account and its sub-accounts
pub fn format_account_details(
    account: &LedgerAccount,
    sub_accounts: &[LedgerSubAccount],
    style: &DisplayStyle,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  Share:        {}\n", share_label(account)));
    output.push_str(&format!(
        "  Sub-account capacity: {}\n",
        style.money(account.sub_account_capacity)
    ));
    output.push_str(&format!("  ID:           {}\n", account.id));
    output.push_str(&format!(
        "  Created:      {}\n",
        account.created_at.format(&style.date_format)
    ));
    output.push('\n');

    if sub_accounts.is_empty() {
        output.push_str("No sub-accounts yet.\n");
        return output;
    }

    let rows: Vec<SubAccountRow> = sub_accounts
        .iter()
        .map(|s| SubAccountRow {
            name: if s.is_filled {
                format!("{} (full)", s.name)
            } else {
                s.name.clone()
            },
            total: style.money(s.total),
            capacity: style.money(s.capacity),
            awaiting: style.money(s.pending_logical),
            cash: s.cash.vector().to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(1..4)).with(Alignment::right()));
    output.push_str(&table.to_string());
    output.push('\n');

    output
}

/// Format all owners as a table
pub fn format_owner_list(owners: &[OwnerSummary], style: &DisplayStyle) -> String {
    if owners.is_empty() {
        return "No owners found.\n".to_string();
    }

    let rows: Vec<OwnerRow> = owners
        .iter()
        .map(|o| OwnerRow {
            name: o.owner.name.clone(),
            accounts: o.account_count,
            balance: style.money(o.logical_total),
            pending: style.money(o.pending.total()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}
