//! Transient state of a calculator form: what has been typed, what is
//! wrong with it, and the last result shown.

use serde::Serialize;

use crate::repayment::calculator::{calculate_with, RepaymentResult};
use crate::repayment::validation::{validate, FieldValue, FormField, RawLoanForm, ValidationErrors};
use crate::types::Rounding;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorForm {
    values: RawLoanForm,
    errors: ValidationErrors,
    result: Option<RepaymentResult>,
    #[serde(skip)]
    rounding: Rounding,
}

impl CalculatorForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rounding(rounding: Rounding) -> Self {
        Self {
            rounding,
            ..Self::default()
        }
    }

    /// Store a raw value. The field's previous error no longer applies and is dropped.
    pub fn set_field(&mut self, field: FormField, value: impl Into<FieldValue>) {
        self.values.set(field, Some(value.into()));
        self.errors.remove(field);
    }

    pub fn clear_field(&mut self, field: FormField) {
        self.values.set(field, None);
        self.errors.remove(field);
    }

    /// Validate the current values and, if they pass, calculate.
    ///
    /// A failed submission replaces any earlier result with "no result", so
    /// errors and figures are never shown together.
    pub fn submit(&mut self) -> Result<RepaymentResult, ValidationErrors> {
        match validate(&self.values) {
            Ok(input) => {
                let result = calculate_with(&input, self.rounding);
                self.errors.clear();
                self.result = Some(result);
                Ok(result)
            }
            Err(errors) => {
                self.errors = errors.clone();
                self.result = None;
                Err(errors)
            }
        }
    }

    /// Clear every value, error, and result. Calling it twice is harmless.
    pub fn reset(&mut self) {
        self.values = RawLoanForm::default();
        self.errors.clear();
        self.result = None;
    }

    pub fn values(&self) -> &RawLoanForm {
        &self.values
    }

    pub fn value(&self, field: FormField) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error_message(&self, field: FormField) -> Option<String> {
        self.errors.get(field).map(ToString::to_string)
    }

    /// `None` until a submission succeeds.
    pub fn result(&self) -> Option<&RepaymentResult> {
        self.result.as_ref()
    }

    /// The result, or zeros when there is none.
    pub fn display_result(&self) -> RepaymentResult {
        self.result.unwrap_or(RepaymentResult::ZERO)
    }
}
