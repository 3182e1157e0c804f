pub mod error;
pub mod repayment;
pub mod time_value;
pub mod types;

pub use error::MortgageError;
pub use repayment::calculator::{
    analyze_repayments, calculate, calculate_with, evaluate_form, RepaymentResult,
};
pub use repayment::form::CalculatorForm;
pub use repayment::validation::{
    validate, FieldError, FieldValue, FormField, LoanInput, RawLoanForm, ValidationErrors,
};
pub use types::*;

/// Standard result type for all mortgage-calc operations
pub type MortgageResult<T> = Result<T, MortgageError>;
