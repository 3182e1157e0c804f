use thiserror::Error;

use crate::repayment::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum MortgageError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<ValidationErrors> for MortgageError {
    fn from(e: ValidationErrors) -> Self {
        MortgageError::Validation(e)
    }
}

impl From<serde_json::Error> for MortgageError {
    fn from(e: serde_json::Error) -> Self {
        MortgageError::SerializationError(e.to_string())
    }
}
