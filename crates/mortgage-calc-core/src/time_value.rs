use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::MortgageError;
use crate::types::{Money, Percent, Rate, MONTHS_PER_YEAR};
use crate::MortgageResult;

fn overflow(context: &str) -> MortgageError {
    MortgageError::Overflow {
        context: context.into(),
    }
}

/// Convert a quoted annual percentage (5.25) to a monthly decimal rate (0.004375).
pub fn monthly_rate_from_percent(annual_percent: Percent) -> MortgageResult<Rate> {
    annual_percent
        .checked_div(dec!(100))
        .and_then(|annual| annual.checked_div(Decimal::from(MONTHS_PER_YEAR)))
        .ok_or_else(|| overflow("monthly rate"))
}

/// Number of monthly instalments in a term of whole years.
pub fn payment_count(term_years: u32) -> MortgageResult<u32> {
    term_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| overflow("payment count"))
}

/// Level payment that amortises `principal` to zero over `nper` periods.
///
/// PMT = P * r / (1 - (1 + r)^-n)
///
/// When `(1 + r)^n` is too large for a `Decimal` its reciprocal is taken as
/// zero and the payment is the interest alone. A zero rate degenerates to
/// straight-line repayment of the principal.
pub fn annuity_payment(rate: Rate, nper: u32, principal: Money) -> MortgageResult<Money> {
    if nper == 0 {
        return Err(MortgageError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }
    if rate <= dec!(-1) {
        return Err(MortgageError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be greater than -100%".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let discount = match (Decimal::ONE + rate).checked_powu(u64::from(nper)) {
        Some(growth) => Decimal::ONE
            .checked_div(growth)
            .ok_or_else(|| overflow("annuity discount factor"))?,
        None => Decimal::ZERO,
    };
    let denominator = Decimal::ONE - discount;

    if denominator.is_zero() {
        return Err(MortgageError::DivisionByZero {
            context: "annuity denominator".into(),
        });
    }

    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| overflow("annuity payment"))
}

/// Per-period payment that covers accrued interest only.
pub fn interest_only_payment(rate: Rate, principal: Money) -> MortgageResult<Money> {
    principal
        .checked_mul(rate)
        .ok_or_else(|| overflow("interest-only payment"))
}
