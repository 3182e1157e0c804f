pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// The object worth showing: the calculation `result`, a validated `input`,
/// or the value itself.
pub(crate) fn primary_object(value: &Value) -> Option<&Map<String, Value>> {
    value
        .get("result")
        .or_else(|| value.get("input"))
        .unwrap_or(value)
        .as_object()
}

/// Field errors of a failed validation, if that is what `value` holds.
pub(crate) fn field_errors(value: &Value) -> Option<&Map<String, Value>> {
    value.get("errors").and_then(Value::as_object)
}

pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
