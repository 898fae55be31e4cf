//! Diff generation for audit logging

use serde_json::Value;

/// Human-readable diff of the top-level fields of two JSON values
///
/// Returns `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes = Vec::new();

            for (key, before_val) in before_obj {
                match after_obj.get(key) {
                    Some(after_val) if after_val != before_val => changes.push(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(before_val),
                        format_value(after_val)
                    )),
                    Some(_) => {}
                    None => changes.push(format!(
                        "{}: {} -> (removed)",
                        key,
                        format_value(before_val)
                    )),
                }
            }

            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) {
                    changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
                }
            }

            if changes.is_empty() {
                None
            } else {
                Some(changes.join(", "))
            }
        }
        _ if before != after => Some(format!(
            "{} -> {}",
            format_value(before),
            format_value(after)
        )),
        _ => None,
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.chars().count() > 50 {
                let head: String = s.chars().take(47).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_field() {
        let before = json!({"name": "Ahorro", "percentage": 3000});
        let after = json!({"name": "Ahorro", "percentage": 2500});
        assert_eq!(
            generate_diff(&before, &after).as_deref(),
            Some("percentage: 3000 -> 2500")
        );
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"active": true});
        let after = json!({"updated": "today"});
        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("active: true -> (removed)"));
        assert!(diff.contains("updated: (added) -> \"today\""));
    }

    #[test]
    fn test_no_change() {
        let value = json!({"cash": {"50": 2}});
        assert!(generate_diff(&value, &value).is_none());
    }

    #[test]
    fn test_scalar_change_and_long_strings() {
        assert_eq!(generate_diff(&json!(1), &json!(2)).as_deref(), Some("1 -> 2"));

        let long = "x".repeat(60);
        let diff = generate_diff(&json!({"memo": ""}), &json!({ "memo": long })).unwrap();
        assert!(diff.ends_with("...\""));
    }
}
