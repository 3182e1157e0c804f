use clap::Args;
use serde::Serialize;
use serde_json::Value;

use mortgage_calc_core::repayment::calculator;
use mortgage_calc_core::repayment::validation::{self, FieldValue};
use mortgage_calc_core::{LoanInput, RawLoanForm, Rounding, ValidationErrors};

use crate::input;

/// The four mortgage form fields. Values are passed through unparsed so the
/// validator can report every problem at once.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Amount borrowed (e.g. 200000)
    #[arg(long, alias = "principal")]
    pub amount: Option<String>,

    /// Mortgage term in whole years (e.g. 25)
    #[arg(long, alias = "years")]
    pub term: Option<String>,

    /// Annual interest rate as a percentage (e.g. 5.25 for 5.25%)
    #[arg(long, alias = "interest-rate")]
    pub rate: Option<String>,

    /// Repayment type: repayment or interestOnly
    #[arg(long = "type", alias = "mortgage-type")]
    pub mortgage_type: Option<String>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the repayment calculation
#[derive(Args)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Tie-break rule for two-decimal rounding: half-away-from-zero or half-even
    #[arg(long, default_value = "half-away-from-zero")]
    pub rounding: Rounding,
}

/// Arguments for form validation
#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

#[derive(Serialize)]
struct ValidationReport {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<LoanInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<ValidationErrors>,
}

impl LoanArgs {
    fn has_field_flags(&self) -> bool {
        self.amount.is_some()
            || self.term.is_some()
            || self.rate.is_some()
            || self.mortgage_type.is_some()
    }

    fn to_form(&self) -> RawLoanForm {
        let field = |v: &Option<String>| v.clone().map(FieldValue::Text);
        RawLoanForm {
            mortgage_amount: field(&self.amount),
            mortgage_term: field(&self.term),
            interest_rate: field(&self.rate),
            mortgage_type: field(&self.mortgage_type),
        }
    }
}

/// Resolve the form from `--input`, then individual flags, then piped stdin.
/// With none of them the form is empty and every field fails as required.
fn read_form(args: &LoanArgs) -> Result<RawLoanForm, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        tracing::debug!(path = %path, "reading mortgage form from file");
        return input::file::read_json(path);
    }
    if args.has_field_flags() {
        return Ok(args.to_form());
    }
    if let Some(form) = input::stdin::read_form()? {
        tracing::debug!("read mortgage form from stdin");
        return Ok(form);
    }
    Ok(RawLoanForm::default())
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let form = read_form(&args.loan)?;
    let result = calculator::evaluate_form(&form, args.rounding)?;
    for warning in &result.warnings {
        tracing::info!("{warning}");
    }
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let form = read_form(&args.loan)?;
    let report = match validation::validate(&form) {
        Ok(input) => ValidationReport {
            valid: true,
            input: Some(input),
            errors: None,
        },
        Err(errors) => ValidationReport {
            valid: false,
            input: None,
            errors: Some(errors),
        },
    };
    Ok(serde_json::to_value(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(amount: Option<&str>, term: Option<&str>, rate: Option<&str>, kind: Option<&str>) -> LoanArgs {
        LoanArgs {
            amount: amount.map(String::from),
            term: term.map(String::from),
            rate: rate.map(String::from),
            mortgage_type: kind.map(String::from),
            input: None,
        }
    }

    #[test]
    fn test_calculate_from_flags() {
        let value = run_calculate(CalculateArgs {
            loan: args(Some("200000"), Some("25"), Some("5"), Some("repayment")),
            rounding: Rounding::default(),
        })
        .unwrap();
        assert_eq!(value["result"]["monthlyPayment"], "1169.18");
        assert_eq!(value["result"]["totalPayment"], "350754.02");
    }

    #[test]
    fn test_calculate_rejects_partial_flags() {
        let err = run_calculate(CalculateArgs {
            loan: args(Some("200000"), None, Some("5"), Some("repayment")),
            rounding: Rounding::default(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("mortgageTerm: This field is required"));
    }

    #[test]
    fn test_validate_reports_field_errors() {
        let value = run_validate(ValidateArgs {
            loan: args(Some("-1"), Some("2.5"), Some("4"), Some("fixed")),
        })
        .unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["errors"]["mortgageAmount"], "Must be positive");
        assert_eq!(value["errors"]["mortgageTerm"], "Must be an integer");
        assert_eq!(value["errors"]["mortgageType"], "This field is required");
        assert!(value.get("input").is_none());
    }

    #[test]
    fn test_validate_echoes_typed_input() {
        let value = run_validate(ValidateArgs {
            loan: args(Some("1000"), Some("5"), Some("3"), Some("interestOnly")),
        })
        .unwrap();
        assert_eq!(value["valid"], true);
        assert_eq!(value["input"]["termYears"], 5);
        assert_eq!(value["input"]["repaymentType"], "interestOnly");
    }
}
