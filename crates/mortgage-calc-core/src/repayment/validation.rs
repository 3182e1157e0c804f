//! Loan form validation.
//!
//! Turns the four raw fields of a mortgage form into a typed [`LoanInput`],
//! or reports every field that is wrong at once. Values may arrive as JSON
//! strings or JSON numbers; both are parsed as `Decimal`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::types::{Money, Percent, RepaymentType, MONTHS_PER_YEAR};

/// Longest term whose monthly payment count still fits in a `u32`.
pub const MAX_TERM_YEARS: u32 = u32::MAX / MONTHS_PER_YEAR;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A single raw form value, as typed by a user or sent by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
}

impl FieldValue {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s.as_str()),
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Decimal> for FieldValue {
    fn from(d: Decimal) -> Self {
        FieldValue::Text(d.to_string())
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<RepaymentType> for FieldValue {
    fn from(t: RepaymentType) -> Self {
        FieldValue::Text(t.as_str().to_string())
    }
}

/// The four fields of the mortgage form, exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLoanForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortgage_amount: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortgage_term: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortgage_type: Option<FieldValue>,
}

impl RawLoanForm {
    pub fn get(&self, field: FormField) -> Option<&FieldValue> {
        match field {
            FormField::MortgageAmount => self.mortgage_amount.as_ref(),
            FormField::MortgageTerm => self.mortgage_term.as_ref(),
            FormField::InterestRate => self.interest_rate.as_ref(),
            FormField::MortgageType => self.mortgage_type.as_ref(),
        }
    }

    pub fn set(&mut self, field: FormField, value: Option<FieldValue>) {
        let slot = match field {
            FormField::MortgageAmount => &mut self.mortgage_amount,
            FormField::MortgageTerm => &mut self.mortgage_term,
            FormField::InterestRate => &mut self.interest_rate,
            FormField::MortgageType => &mut self.mortgage_type,
        };
        *slot = value;
    }
}

impl From<&LoanInput> for RawLoanForm {
    fn from(input: &LoanInput) -> Self {
        RawLoanForm {
            mortgage_amount: Some(input.principal.into()),
            mortgage_term: Some(input.term_years.into()),
            interest_rate: Some(input.annual_interest_rate_percent.into()),
            mortgage_type: Some(input.repayment_type.into()),
        }
    }
}

/// Validated request to the repayment calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanInput {
    /// Amount borrowed.
    pub principal: Money,
    /// Whole years over which the loan runs.
    pub term_years: u32,
    /// Annual rate as quoted (5.25 = 5.25%).
    pub annual_interest_rate_percent: Percent,
    pub repayment_type: RepaymentType,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Names of the form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    MortgageAmount,
    MortgageTerm,
    InterestRate,
    MortgageType,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::MortgageAmount,
        FormField::MortgageTerm,
        FormField::InterestRate,
        FormField::MortgageType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::MortgageAmount => "mortgageAmount",
            FormField::MortgageTerm => "mortgageTerm",
            FormField::InterestRate => "interestRate",
            FormField::MortgageType => "mortgageType",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown form field '{s}'"))
    }
}

/// Why a single field was rejected. `Display` is the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("This field is required")]
    Required,
    #[error("Must be a number")]
    NotANumber,
    #[error("Must be positive")]
    NotPositive,
    #[error("Must be an integer")]
    NotInteger,
    #[error("Must be at most {max}")]
    TooLarge { max: u32 },
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Every rejected field with its reason. Serialises as `{field: message}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, FieldError>,
}

impl ValidationErrors {
    pub fn insert(&mut self, field: FormField, error: FieldError) {
        self.errors.insert(field, error);
    }

    pub fn remove(&mut self, field: FormField) -> Option<FieldError> {
        self.errors.remove(&field)
    }

    pub fn get(&self, field: FormField) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &FieldError)> {
        self.errors.iter().map(|(f, e)| (*f, e))
    }

    /// Field name to message, the shape presentation layers consume.
    pub fn messages(&self) -> BTreeMap<&'static str, String> {
        self.iter()
            .map(|(field, error)| (field.as_str(), error.to_string()))
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {error}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate a submitted form.
///
/// Every field is checked; on failure all field errors are returned together
/// and no `LoanInput` is produced.
pub fn validate(form: &RawLoanForm) -> Result<LoanInput, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let principal = record(
        &mut errors,
        FormField::MortgageAmount,
        parse_positive(form.mortgage_amount.as_ref()),
    );
    let term_years = record(
        &mut errors,
        FormField::MortgageTerm,
        parse_term(form.mortgage_term.as_ref()),
    );
    let rate = record(
        &mut errors,
        FormField::InterestRate,
        parse_positive(form.interest_rate.as_ref()),
    );
    let repayment_type = record(
        &mut errors,
        FormField::MortgageType,
        parse_repayment_type(form.mortgage_type.as_ref()),
    );

    match (principal, term_years, rate, repayment_type) {
        (Some(principal), Some(term_years), Some(rate), Some(repayment_type)) => {
            tracing::debug!(%principal, term_years, %rate, %repayment_type, "loan form accepted");
            Ok(LoanInput {
                principal,
                term_years,
                annual_interest_rate_percent: rate,
                repayment_type,
            })
        }
        _ => {
            tracing::debug!(rejected = %errors, "loan form rejected");
            Err(errors)
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn record<T>(
    errors: &mut ValidationErrors,
    field: FormField,
    parsed: Result<T, FieldError>,
) -> Option<T> {
    match parsed {
        Ok(v) => Some(v),
        Err(e) => {
            errors.insert(field, e);
            None
        }
    }
}

/// Trimmed text of a present, non-blank value.
fn present_text(value: Option<&FieldValue>) -> Result<Cow<'_, str>, FieldError> {
    let text = value.ok_or(FieldError::Required)?.as_text();
    if text.trim().is_empty() {
        return Err(FieldError::Required);
    }
    Ok(match text {
        Cow::Borrowed(s) => Cow::Borrowed(s.trim()),
        Cow::Owned(s) => Cow::Owned(s.trim().to_string()),
    })
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    // `Decimal::from_str` skips digit separators
    if text.contains('_') {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn parse_positive(value: Option<&FieldValue>) -> Result<Decimal, FieldError> {
    let text = present_text(value)?;
    let number = parse_decimal(&text).ok_or(FieldError::NotANumber)?;
    if number <= Decimal::ZERO {
        return Err(FieldError::NotPositive);
    }
    Ok(number)
}

fn parse_term(value: Option<&FieldValue>) -> Result<u32, FieldError> {
    let too_large = FieldError::TooLarge {
        max: MAX_TERM_YEARS,
    };
    let years = parse_positive(value).map_err(|e| match e {
        FieldError::NotANumber => out_of_decimal_range(value, too_large).unwrap_or(e),
        other => other,
    })?;
    if !years.fract().is_zero() {
        return Err(FieldError::NotInteger);
    }
    years
        .to_u32()
        .filter(|y| *y <= MAX_TERM_YEARS)
        .ok_or(too_large)
}

/// Classify a well-formed numeral that `Decimal` cannot hold, such as `1e30`.
fn out_of_decimal_range(value: Option<&FieldValue>, too_large: FieldError) -> Option<FieldError> {
    let text = present_text(value).ok()?;
    let approx = text.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if approx <= 0.0 {
        FieldError::NotPositive
    } else if approx < 1.0 {
        FieldError::NotInteger
    } else {
        too_large
    })
}

fn parse_repayment_type(value: Option<&FieldValue>) -> Result<RepaymentType, FieldError> {
    match value {
        Some(FieldValue::Text(s)) => s.trim().parse().map_err(|_| FieldError::Required),
        _ => Err(FieldError::Required),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn form(amount: &str, term: &str, rate: &str, kind: &str) -> RawLoanForm {
        RawLoanForm {
            mortgage_amount: Some(amount.into()),
            mortgage_term: Some(term.into()),
            interest_rate: Some(rate.into()),
            mortgage_type: Some(kind.into()),
        }
    }

    #[test]
    fn test_valid_form() {
        let input = validate(&form("200000", "25", "5.25", "repayment")).unwrap();
        assert_eq!(
            input,
            LoanInput {
                principal: dec!(200000),
                term_years: 25,
                annual_interest_rate_percent: dec!(5.25),
                repayment_type: RepaymentType::Repayment,
            }
        );
    }

    #[test]
    fn test_values_are_trimmed() {
        let input = validate(&form(" 1000 ", "\t5", "3 ", " interestOnly ")).unwrap();
        assert_eq!(input.principal, dec!(1000));
        assert_eq!(input.term_years, 5);
        assert_eq!(input.repayment_type, RepaymentType::InterestOnly);
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = validate(&RawLoanForm::default()).unwrap_err();
        assert_eq!(errors.len(), 4);
        for field in FormField::ALL {
            assert_eq!(errors.get(field), Some(&FieldError::Required));
        }
    }

    #[test]
    fn test_blank_amount_is_required() {
        let errors = validate(&form("   ", "25", "5", "repayment")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(FormField::MortgageAmount),
            Some(&FieldError::Required)
        );
    }

    #[test]
    fn test_non_numeric_amount() {
        let errors = validate(&form("lots", "25", "5", "repayment")).unwrap_err();
        assert_eq!(
            errors.get(FormField::MortgageAmount),
            Some(&FieldError::NotANumber)
        );
    }

    #[test]
    fn test_zero_and_negative_values_rejected() {
        let errors = validate(&form("0", "-3", "-1.5", "repayment")).unwrap_err();
        assert_eq!(
            errors.get(FormField::MortgageAmount),
            Some(&FieldError::NotPositive)
        );
        assert_eq!(
            errors.get(FormField::MortgageTerm),
            Some(&FieldError::NotPositive)
        );
        assert_eq!(
            errors.get(FormField::InterestRate),
            Some(&FieldError::NotPositive)
        );
        assert!(!errors.contains(FormField::MortgageType));
    }

    #[test]
    fn test_fractional_term_rejected() {
        let errors = validate(&form("100000", "2.5", "4", "repayment")).unwrap_err();
        let err = errors.get(FormField::MortgageTerm).unwrap();
        assert_eq!(*err, FieldError::NotInteger);
        assert_eq!(err.to_string(), "Must be an integer");
    }

    #[test]
    fn test_integral_decimal_term_accepted() {
        let input = validate(&form("100000", "25.0", "4", "repayment")).unwrap();
        assert_eq!(input.term_years, 25);
    }

    #[test]
    fn test_oversized_term_rejected() {
        let errors = validate(&form("100000", "400000000", "4", "repayment")).unwrap_err();
        assert_eq!(
            errors.get(FormField::MortgageTerm),
            Some(&FieldError::TooLarge {
                max: MAX_TERM_YEARS
            })
        );
    }

    #[test]
    fn test_term_beyond_decimal_range_is_too_large() {
        let raw: RawLoanForm = serde_json::from_str(
            r#"{"mortgageAmount": 1000, "mortgageTerm": 1e30, "interestRate": 3, "mortgageType": "repayment"}"#,
        )
        .unwrap();
        let errors = validate(&raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(FormField::MortgageTerm),
            Some(&FieldError::TooLarge {
                max: MAX_TERM_YEARS
            })
        );

        let errors = validate(&form("1000", "-1e30", "3", "repayment")).unwrap_err();
        assert_eq!(
            errors.get(FormField::MortgageTerm),
            Some(&FieldError::NotPositive)
        );
    }

    #[test]
    fn test_digit_separators_are_not_numbers() {
        let errors = validate(&form("1_000", "2_5", "5", "repayment")).unwrap_err();
        assert_eq!(
            errors.get(FormField::MortgageAmount),
            Some(&FieldError::NotANumber)
        );
        assert_eq!(
            errors.get(FormField::MortgageTerm),
            Some(&FieldError::NotANumber)
        );
    }

    #[test]
    fn test_typed_input_revalidates_as_form() {
        let input = validate(&form("200000", "25", "5", "interestOnly")).unwrap();
        assert_eq!(validate(&RawLoanForm::from(&input)).unwrap(), input);

        let negative = LoanInput {
            principal: dec!(-1000),
            ..input
        };
        let errors = validate(&RawLoanForm::from(&negative)).unwrap_err();
        assert_eq!(
            errors.get(FormField::MortgageAmount),
            Some(&FieldError::NotPositive)
        );
    }

    #[test]
    fn test_unknown_mortgage_type_is_required() {
        for kind in ["", "Repayment", "fixed", "interest_only"] {
            let errors = validate(&form("1000", "5", "3", kind)).unwrap_err();
            assert_eq!(
                errors.get(FormField::MortgageType),
                Some(&FieldError::Required),
                "mortgage type {kind:?}"
            );
        }
    }

    #[test]
    fn test_scientific_notation_accepted() {
        let input = validate(&form("2e5", "25", "5", "repayment")).unwrap();
        assert_eq!(input.principal, dec!(200000));
    }

    #[test]
    fn test_json_numbers_and_strings_both_accepted() {
        let raw: RawLoanForm = serde_json::from_str(
            r#"{"mortgageAmount": 300000, "mortgageTerm": "30", "interestRate": 3.5, "mortgageType": "repayment"}"#,
        )
        .unwrap();
        let input = validate(&raw).unwrap();
        assert_eq!(input.principal, dec!(300000));
        assert_eq!(input.term_years, 30);
        assert_eq!(input.annual_interest_rate_percent, dec!(3.5));
    }

    #[test]
    fn test_numeric_mortgage_type_rejected() {
        let raw: RawLoanForm = serde_json::from_str(
            r#"{"mortgageAmount": 1, "mortgageTerm": 1, "interestRate": 1, "mortgageType": 1}"#,
        )
        .unwrap();
        let errors = validate(&raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(FormField::MortgageType));
    }

    #[test]
    fn test_errors_serialize_as_field_messages() {
        let errors = validate(&form("", "2.5", "x", "")).unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "mortgageAmount": "This field is required",
                "mortgageTerm": "Must be an integer",
                "interestRate": "Must be a number",
                "mortgageType": "This field is required",
            })
        );
    }

    #[test]
    fn test_errors_display_in_field_order() {
        let errors = validate(&form("1000", "5", "0", "")).unwrap_err();
        assert_eq!(
            errors.to_string(),
            "interestRate: Must be positive; mortgageType: This field is required"
        );
    }

    #[test]
    fn test_form_field_parse() {
        assert_eq!(
            "interestRate".parse::<FormField>().unwrap(),
            FormField::InterestRate
        );
        assert!("rate".parse::<FormField>().is_err());
    }
}
