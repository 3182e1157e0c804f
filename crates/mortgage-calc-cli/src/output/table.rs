use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use super::{field_errors, primary_object, scalar_text};

/// Format output as a two-column table using the tabled crate.
pub fn print_table(value: &Value) {
    if let Some(errors) = field_errors(value) {
        print_pairs(["Field", "Error"], errors, |_, v| scalar_text(v));
        return;
    }

    match primary_object(value) {
        Some(map) => print_pairs(["Field", "Value"], map, format_value),
        None => println!("{}", scalar_text(value)),
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_pairs(
    header: [&str; 2],
    map: &Map<String, Value>,
    render: impl Fn(&str, &Value) -> String,
) {
    let mut builder = Builder::default();
    builder.push_record(header);
    for (key, val) in map {
        builder.push_record([label(key).to_string(), render(key, val)]);
    }
    println!("{}", Table::from(builder));
}

fn label(key: &str) -> &str {
    match key {
        "monthlyPayment" => "Monthly repayment",
        "totalPayment" => "Total repayment",
        "principal" => "Principal",
        "termYears" => "Term (years)",
        "annualInterestRatePercent" => "Interest rate (%)",
        "repaymentType" => "Repayment type",
        other => other,
    }
}

fn format_value(key: &str, value: &Value) -> String {
    match key {
        "monthlyPayment" | "totalPayment" | "principal" => {
            let text = scalar_text(value);
            Decimal::from_str(&text)
                .map(group_thousands)
                .unwrap_or(text)
        }
        _ => scalar_text(value),
    }
}

/// 350754.02 -> "350,754.02"
fn group_thousands(amount: Decimal) -> String {
    let text = amount.round_dp(2).to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (whole, frac) = match unsigned.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
