use mortgage_calc_core::RawLoanForm;
use std::io::{self, Read};

/// Read a mortgage form as JSON from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive) or the pipe is empty.
pub fn read_form() -> Result<Option<RawLoanForm>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_form(&buffer)
}

fn parse_form(buffer: &str) -> Result<Option<RawLoanForm>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let form: RawLoanForm = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse mortgage form from stdin: {e}"))?;
    Ok(Some(form))
}
