//! Common numeric types and helpers used across the platform

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Decimal places used for currency amounts
pub const MONEY_SCALE: u32 = 2;

/// Tolerance used when checking that percentage shares sum to 100
pub fn percentage_tolerance() -> Decimal {
    Decimal::new(1, 6)
}

/// The constant 100, used for percent conversions
pub fn hundred() -> Decimal {
    Decimal::ONE_HUNDRED
}

/// `part / whole * 100`, or zero when `whole` is zero
///
/// `field` names the input reported when the result does not fit in a `Decimal`.
pub fn percent_of(field: &str, part: Decimal, whole: Decimal) -> EngineResult<Decimal> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    part
        .checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(hundred()))
        .ok_or_else(|| EngineError::too_large(field))
}

/// `whole * percent / 100`
pub fn portion_of(field: &str, whole: Decimal, percent: Decimal) -> EngineResult<Decimal> {
    whole
        .checked_mul(percent)
        .and_then(|product| product.checked_div(hundred()))
        .ok_or_else(|| EngineError::too_large(field))
}

/// Sum that fails instead of overflowing
pub fn checked_total<I>(field: &str, values: I) -> EngineResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(value))
        .ok_or_else(|| EngineError::too_large(field))
}

/// Round half-up (away from zero) to currency precision
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
