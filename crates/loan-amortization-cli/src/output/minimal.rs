use serde_json::Value;

/// Print just the headline payment from the output.
///
/// Prefers the display-rounded figure, then well-known result fields in
/// priority order, then the first field of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = ["total_monthly_payment", "emi", "periodic_payment"];

    if let Value::Object(map) = result_obj {
        if let Some(payment) = map
            .get("display")
            .and_then(|d| d.get("periodic_payment"))
            .filter(|_| !map.contains_key("total_monthly_payment"))
        {
            println!("{}", format_minimal(payment));
            return;
        }

        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
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
