//! Transaction history display

use std::collections::HashMap;

use super::DisplayStyle;
use crate::audit::AuditEntry;
use crate::models::{AccountId, TransactionGroup};

/// Format transaction groups as a register, one line per entry
pub fn format_history(
    groups: &[TransactionGroup],
    account_names: &HashMap<AccountId, String>,
    style: &DisplayStyle,
) -> String {
    if groups.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    for group in groups {
        output.push_str(&format!(
            "{}  {:<10} {}  [{}]\n",
            group.created_at.format(&style.date_format),
            group.kind.to_string(),
            group.description,
            group.id
        ));
        if !group.cash.is_empty() {
            output.push_str(&format!("    cash: {}\n", group.cash));
        }
        for entry in &group.entries {
            let account = account_names
                .get(&entry.account_id)
                .map(String::as_str)
                .unwrap_or("Unknown");
            output.push_str(&format!(
                "    {:<10} {:<20} {:>12}\n",
                entry.kind.to_string(),
                account,
                style.money(entry.amount)
            ));
        }
    }

    output
}

/// Format audit log entries, oldest first
pub fn format_audit_log(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "Audit log is empty.\n".to_string();
    }
    entries
        .iter()
        .map(|entry| format!("{}\n", entry.format_human_readable()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryKind, GroupKind, LedgerEntry, Money, OwnerId};

    #[test]
    fn test_format_history() {
        let account_id = AccountId::new();
        let mut names = HashMap::new();
        names.insert(account_id, "Principal".to_string());

        let mut group = TransactionGroup::new(OwnerId::new(), GroupKind::Withdrawal, "Mercado");
        group.push(LedgerEntry::new(
            EntryKind::Withdrawal,
            account_id,
            Money::from_cents(-2_000),
            "Mercado",
        ));

        let output = format_history(&[group], &names, &DisplayStyle::default());

        assert!(output.contains("Withdrawal Mercado"));
        assert!(output.contains("Principal"));
        assert!(output.contains("-$20.00"));
        assert!(!output.contains("cash:"));
    }

    #[test]
    fn test_format_audit_log() {
        use crate::audit::EntityType;

        let entry = AuditEntry::create(
            EntityType::Owner,
            "own-12345678",
            Some("ana".to_string()),
            &serde_json::json!({ "name": "ana" }),
        );
        let output = format_audit_log(&[entry]);
        assert!(output.contains("CREATE Owner own-12345678 (ana)"));
        assert_eq!(format_audit_log(&[]), "Audit log is empty.\n");
    }

    #[test]
    fn test_format_empty_history() {
        assert_eq!(
            format_history(&[], &HashMap::new(), &DisplayStyle::default()),
            "No transactions found.\n"
        );
    }
}
