use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Rates quoted the way borrowers see them (5.25 = 5.25%).
pub type Percent = Decimal;

/// Decimal places carried by every reported money figure.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Months in a year; converts annual terms and rates to monthly periods.
pub const MONTHS_PER_YEAR: u32 = 12;

/// How a loan is paid back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RepaymentType {
    /// Amortising: every instalment pays interest and part of the principal.
    Repayment,
    /// Every instalment pays interest only; principal is due at term end.
    InterestOnly,
}

impl RepaymentType {
    /// Wire name used by forms and JSON inputs.
    pub fn as_str(&self) -> &'static str {
        match self {
            RepaymentType::Repayment => "repayment",
            RepaymentType::InterestOnly => "interestOnly",
        }
    }
}

impl fmt::Display for RepaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepaymentType {
    type Err = String;

    /// Exact match only: `"Repayment"` or `" repayment"` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repayment" => Ok(RepaymentType::Repayment),
            "interestOnly" => Ok(RepaymentType::InterestOnly),
            other => Err(format!(
                "unknown mortgage type '{other}' (expected 'repayment' or 'interestOnly')"
            )),
        }
    }
}

/// Tie-breaking rule used when reported figures are cut to two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// 0.125 -> 0.13, the behaviour of fixed-point string formatting.
    #[default]
    HalfAwayFromZero,
    /// 0.125 -> 0.12, banker's rounding.
    HalfEven,
}

impl Rounding {
    pub fn strategy(self) -> RoundingStrategy {
        match self {
            Rounding::HalfAwayFromZero => RoundingStrategy::MidpointAwayFromZero,
            Rounding::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }

    /// Round a money amount to [`MONEY_DECIMAL_PLACES`].
    pub fn round_money(self, value: Money) -> Money {
        value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, self.strategy())
    }
}

impl FromStr for Rounding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "half-away-from-zero" | "half-up" => Ok(Rounding::HalfAwayFromZero),
            "half-even" | "bankers" => Ok(Rounding::HalfEven),
            other => Err(format!(
                "unknown rounding '{other}' (expected 'half-away-from-zero' or 'half-even')"
            )),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
    pub rounding: Rounding,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    rounding: Rounding,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
            rounding,
        },
    }
}
