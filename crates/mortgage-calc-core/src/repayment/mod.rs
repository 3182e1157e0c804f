//! Residential mortgage repayments: form validation, the repayment
//! calculation itself, and the transient state of a calculator form.

pub mod calculator;
pub mod form;
pub mod validation;
