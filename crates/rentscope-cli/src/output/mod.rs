pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Locate the primary result object inside a command's output: either the
/// computation envelope itself, or one nested under a `metrics` key (as the
/// `open` and `history show` commands produce).
pub fn result_envelope(value: &Value) -> Option<&serde_json::Map<String, Value>> {
    let map = value.as_object()?;
    if map.contains_key("result") {
        return Some(map);
    }
    map.get("metrics")?.as_object().filter(|m| m.contains_key("result"))
}
