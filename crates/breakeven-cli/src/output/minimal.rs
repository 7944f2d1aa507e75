use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Looks inside `result.break_even` when present, then for well-known
/// fields in order of priority, then falls back to the first field.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(value));
}

fn minimal_answer(value: &Value) -> String {
    // Try to extract the "result" envelope
    let mut result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(be) = result_obj.get("break_even") {
        if be.is_null() {
            return "n/a".to_string();
        }
        result_obj = be;
    }

    // Priority list of key output fields
    let priority_keys = ["units", "revenue", "target_volume"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_break_even_units_first() {
        let v = json!({"result": {"units": "2000", "revenue": "20000"}});
        assert_eq!(minimal_answer(&v), "2000");
    }

    #[test]
    fn test_nested_break_even() {
        let v = json!({"result": {"break_even": {"units": "2000"}, "report": []}});
        assert_eq!(minimal_answer(&v), "2000");
    }

    #[test]
    fn test_missing_break_even() {
        let v = json!({"result": {"break_even": null, "report": []}});
        assert_eq!(minimal_answer(&v), "n/a");
    }
}
