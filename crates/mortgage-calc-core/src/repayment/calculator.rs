//! Monthly and total repayments for a validated loan.
//!
//! Repayment loans use the level-payment annuity formula with monthly
//! compounding; interest-only loans pay the monthly accrual and leave the
//! principal outstanding. Both figures are reported to two decimals.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::repayment::validation::{validate, LoanInput, RawLoanForm};
use crate::time_value::{
    annuity_payment, interest_only_payment, monthly_rate_from_percent, payment_count,
};
use crate::types::{with_metadata, ComputationOutput, Money, RepaymentType, Rounding};
use crate::MortgageResult;

/// Quoted rates above this are flagged as implausible for a mortgage.
const HIGH_RATE_PERCENT: Decimal = dec!(25);

/// Quoted rates below this usually mean a decimal (0.05) was entered for a percentage (5).
const LOW_RATE_PERCENT: Decimal = dec!(0.5);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepaymentResult {
    /// Instalment due each month.
    pub monthly_payment: Money,
    /// Sum of all instalments over the term.
    pub total_payment: Money,
}

impl RepaymentResult {
    /// What a form shows before anything has been calculated.
    pub const ZERO: RepaymentResult = RepaymentResult {
        monthly_payment: Decimal::ZERO,
        total_payment: Decimal::ZERO,
    };

    pub fn is_zero(&self) -> bool {
        self.monthly_payment.is_zero() && self.total_payment.is_zero()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Repayments for `input`, rounded half away from zero.
pub fn calculate(input: &LoanInput) -> RepaymentResult {
    calculate_with(input, Rounding::default())
}

/// Repayments for `input` with an explicit rounding rule.
///
/// Never fails: a zero-length term or parameters too large to represent
/// yield [`RepaymentResult::ZERO`].
pub fn calculate_with(input: &LoanInput, rounding: Rounding) -> RepaymentResult {
    match unrounded_payments(input) {
        Ok((monthly, total)) => round_result(monthly, total, rounding),
        Err(e) => {
            tracing::debug!(error = %e, "degenerate loan parameters, reporting zero repayments");
            RepaymentResult::ZERO
        }
    }
}

/// Calculate repayments and wrap them in the standard output envelope,
/// with reasonableness warnings.
pub fn analyze_repayments(
    input: &LoanInput,
    rounding: Rounding,
) -> ComputationOutput<RepaymentResult> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = match unrounded_payments(input) {
        Ok((monthly, total)) => round_result(monthly, total, rounding),
        Err(e) => {
            warnings.push(format!(
                "Degenerate loan parameters ({e}); repayments reported as zero"
            ));
            RepaymentResult::ZERO
        }
    };

    if input.repayment_type == RepaymentType::InterestOnly && !result.is_zero() {
        warnings.push(format!(
            "Interest-only: the principal of {} remains due in full at the end of the {}-year term",
            input.principal, input.term_years
        ));
    }
    if input.annual_interest_rate_percent > HIGH_RATE_PERCENT {
        warnings.push(format!(
            "Interest rate of {}% is unusually high for a mortgage; verify the rate",
            input.annual_interest_rate_percent
        ));
    } else if input.annual_interest_rate_percent > Decimal::ZERO
        && input.annual_interest_rate_percent < LOW_RATE_PERCENT
    {
        warnings.push(format!(
            "Interest rate of {}% is below {LOW_RATE_PERCENT}%; rates are quoted as percentages (5 = 5%)",
            input.annual_interest_rate_percent
        ));
    }

    let methodology = match input.repayment_type {
        RepaymentType::Repayment => "Level-payment annuity, monthly compounding",
        RepaymentType::InterestOnly => "Interest-only, monthly accrual",
    };

    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(methodology, input, warnings, elapsed, rounding, result)
}

/// Validate a raw form and, if it passes, analyse the resulting loan.
pub fn evaluate_form(
    form: &RawLoanForm,
    rounding: Rounding,
) -> MortgageResult<ComputationOutput<RepaymentResult>> {
    let input = validate(form)?;
    Ok(analyze_repayments(&input, rounding))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// (monthly, total) before rounding; total is built from the unrounded monthly figure.
fn unrounded_payments(input: &LoanInput) -> MortgageResult<(Money, Money)> {
    let n = payment_count(input.term_years)?;
    if n == 0 {
        return Err(MortgageError::InvalidInput {
            field: "term_years".into(),
            reason: "Loan term must cover at least one monthly payment".into(),
        });
    }

    let monthly_rate = monthly_rate_from_percent(input.annual_interest_rate_percent)?;

    let monthly = match input.repayment_type {
        RepaymentType::Repayment => annuity_payment(monthly_rate, n, input.principal)?,
        RepaymentType::InterestOnly => interest_only_payment(monthly_rate, input.principal)?,
    };

    let total = monthly
        .checked_mul(Decimal::from(n))
        .ok_or_else(|| MortgageError::Overflow {
            context: "total payment".into(),
        })?;

    Ok((monthly, total))
}

fn round_result(monthly: Money, total: Money, rounding: Rounding) -> RepaymentResult {
    RepaymentResult {
        monthly_payment: rounding.round_money(monthly),
        total_payment: rounding.round_money(total),
    }
}
