use serde_json::{Map, Value};
use std::io;

use super::{field_errors, primary_object, scalar_text};

/// Write output as two-column CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_csv<W: io::Write>(out: W, value: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);

    if let Some(errors) = field_errors(value) {
        write_pairs(&mut wtr, ["field", "error"], errors)?;
    } else if let Some(map) = primary_object(value) {
        write_pairs(&mut wtr, ["field", "value"], map)?;
    } else {
        wtr.write_record([scalar_text(value)])?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_pairs<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    header: [&str; 2],
    map: &Map<String, Value>,
) -> Result<(), csv::Error> {
    wtr.write_record(header)?;
    for (key, val) in map {
        wtr.write_record([key.as_str(), &scalar_text(val)])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_result_rows() {
        let v = json!({"result": {"monthlyPayment": "833.33", "totalPayment": "250000.00"}});
        assert_eq!(
            render(&v),
            "field,value\nmonthlyPayment,833.33\ntotalPayment,250000.00\n"
        );
    }

    #[test]
    fn test_error_rows() {
        let v = json!({"valid": false, "errors": {"mortgageAmount": "This field is required"}});
        assert_eq!(
            render(&v),
            "field,error\nmortgageAmount,This field is required\n"
        );
    }
}
