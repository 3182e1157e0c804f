use serde_json::Value;

use super::{field_errors, primary_object, scalar_text};

/// Print just the key answer: the monthly repayment, `valid`, or one line
/// per field error.
pub fn print_minimal(value: &Value) {
    for line in minimal_lines(value) {
        println!("{}", line);
    }
}

fn minimal_lines(value: &Value) -> Vec<String> {
    if let Some(errors) = field_errors(value) {
        return errors
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, scalar_text(msg)))
            .collect();
    }

    if value.get("valid") == Some(&Value::Bool(true)) {
        return vec!["valid".to_string()];
    }

    let Some(map) = primary_object(value) else {
        return vec![scalar_text(value)];
    };

    if let Some(monthly) = map.get("monthlyPayment").filter(|v| !v.is_null()) {
        return vec![scalar_text(monthly)];
    }

    map.iter()
        .next()
        .map(|(key, val)| vec![format!("{}: {}", key, scalar_text(val))])
        .unwrap_or_default()
}
