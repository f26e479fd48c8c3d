use serde_json::Value;

use super::result_envelope;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = result_envelope(value)
        .and_then(|envelope| envelope.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "cap_rate",
        "cash_on_cash_return",
        "annual_cash_flow",
        "noi",
        "monthly_mortgage_payment",
        "token",
        "status",
        "list_price",
    ];

    if let Value::Object(map) = result_obj {
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
