//! CSV export
//!
//! One row per ledger entry, oldest group first, for spreadsheets.

use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

use crate::error::LedgerResult;
use crate::models::OwnerId;
use crate::storage::Storage;

#[derive(Debug, Serialize)]
struct EntryRow<'a> {
    group_id: String,
    posted_at: String,
    operation: String,
    entry_kind: String,
    account: &'a str,
    amount: String,
    amount_cents: i64,
    description: &'a str,
    cash: String,
}

/// Export every ledger entry of one owner; returns the number of rows
pub fn export_entries_csv<W: Write>(
    storage: &Storage,
    owner_id: OwnerId,
    writer: W,
) -> LedgerResult<usize> {
    let data = storage.snapshot()?;
    data.owner(owner_id)?;

    let account_names: HashMap<_, _> = data
        .accounts_of(owner_id)
        .into_iter()
        .map(|a| (a.id, a.name.as_str()))
        .collect();

    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0;

    for group in data.groups_of(owner_id).into_iter().rev() {
        let posted_at = group.created_at.to_rfc3339();
        let cash = group.cash.to_string();
        for entry in &group.entries {
            csv_writer.serialize(EntryRow {
                group_id: group.id.as_uuid().to_string(),
                posted_at: posted_at.clone(),
                operation: group.kind.to_string(),
                entry_kind: entry.kind.to_string(),
                account: account_names
                    .get(&entry.account_id)
                    .copied()
                    .unwrap_or("Unknown"),
                amount: entry.amount.to_string(),
                amount_cents: entry.amount.cents(),
                description: &entry.description,
                cash: cash.clone(),
            })?;
            rows += 1;
        }
    }

    csv_writer.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{create_storage, owner_with_expense};
    use crate::services::{DepositService, WithdrawalService};

    #[test]
    fn test_entries_csv() {
        let (_temp, storage) = create_storage();
        let owner_id = owner_with_expense(&storage);

        let mut deposit = HashMap::new();
        deposit.insert("20", 5);
        DepositService::new(&storage)
            .apply_deposit(owner_id, &deposit)
            .unwrap();
        let mut withdrawal = HashMap::new();
        withdrawal.insert("20", 1);
        WithdrawalService::new(&storage)
            .withdraw(owner_id, "Principal", &withdrawal, Some("Mercado"))
            .unwrap();

        let mut output = Vec::new();
        let rows = export_entries_csv(&storage, owner_id, &mut output).unwrap();
        assert_eq!(rows, 5);

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("group_id,posted_at,operation,entry_kind,account"));
        assert!(lines[1].contains("Expense,Expenses"));
        assert!(lines[5].contains("Withdrawal,Withdrawal,Principal,-$20.00,-2000,Mercado"));
    }
}
