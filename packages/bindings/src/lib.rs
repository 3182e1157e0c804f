use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;

use mortgage_calc_core::repayment::{calculator, validation};
use mortgage_calc_core::{
    CalculatorForm, FieldValue, FormField, LoanInput, RawLoanForm, Rounding, ValidationErrors,
};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Field errors are thrown as their JSON mapping so callers can `JSON.parse` the message.
fn validation_error(errors: &ValidationErrors) -> napi::Error {
    match serde_json::to_string(errors) {
        Ok(json) => napi::Error::from_reason(json),
        Err(e) => to_napi_error(e),
    }
}

fn parse_rounding(rounding: Option<String>) -> NapiResult<Rounding> {
    rounding
        .map(|r| r.parse::<Rounding>().map_err(to_napi_error))
        .transpose()
        .map(Option::unwrap_or_default)
}

#[derive(Serialize)]
struct ValidationOutcome {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<LoanInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<ValidationErrors>,
}

// ---------------------------------------------------------------------------
// Stateless functions
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_loan(form_json: String) -> NapiResult<String> {
    let form: RawLoanForm = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let outcome = match validation::validate(&form) {
        Ok(input) => ValidationOutcome {
            valid: true,
            input: Some(input),
            errors: None,
        },
        Err(errors) => ValidationOutcome {
            valid: false,
            input: None,
            errors: Some(errors),
        },
    };
    serde_json::to_string(&outcome).map_err(to_napi_error)
}

/// Takes a typed loan (`principal`, `termYears`, ...). It is run back through the
/// form validator, so a negative or zero value throws the field-error mapping.
#[napi]
pub fn calculate_repayments(input_json: String, rounding: Option<String>) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let input =
        validation::validate(&RawLoanForm::from(&input)).map_err(|e| validation_error(&e))?;
    let result = calculator::calculate_with(&input, parse_rounding(rounding)?);
    serde_json::to_string(&result).map_err(to_napi_error)
}

#[napi]
pub fn analyze_repayments(form_json: String, rounding: Option<String>) -> NapiResult<String> {
    let form: RawLoanForm = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let input = validation::validate(&form).map_err(|e| validation_error(&e))?;
    let output = calculator::analyze_repayments(&input, parse_rounding(rounding)?);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Stateful form
// ---------------------------------------------------------------------------

#[napi(js_name = "MortgageForm")]
pub struct JsMortgageForm {
    inner: CalculatorForm,
}

#[napi]
impl JsMortgageForm {
    #[napi(constructor)]
    pub fn new(rounding: Option<String>) -> napi::Result<Self> {
        Ok(Self {
            inner: CalculatorForm::with_rounding(parse_rounding(rounding)?),
        })
    }

    /// `field` is a form field name such as `"mortgageAmount"`.
    #[napi]
    pub fn set_field(&mut self, field: String, value: Option<String>) -> NapiResult<()> {
        let field: FormField = field.parse().map_err(to_napi_error)?;
        match value {
            Some(v) => self.inner.set_field(field, FieldValue::Text(v)),
            None => self.inner.clear_field(field),
        }
        Ok(())
    }

    /// Returns the result JSON, or throws the field-error mapping as JSON.
    #[napi]
    pub fn submit(&mut self) -> NapiResult<String> {
        let result = self.inner.submit().map_err(|e| validation_error(&e))?;
        serde_json::to_string(&result).map_err(to_napi_error)
    }

    #[napi]
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Current values, errors, and result (null when nothing has been calculated).
    #[napi]
    pub fn state(&self) -> NapiResult<String> {
        serde_json::to_string(&self.inner).map_err(to_napi_error)
    }
}
