//! Price models and monetary value calculation

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Commodity;
use crate::error::{EngineError, EngineResult};
use crate::types::round_currency;
use crate::validation::validate_non_negative;

/// Price per kilogram for a commodity over a validity window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRate {
    pub commodity: Commodity,
    pub price_per_kg: Decimal,
    pub valid_from: NaiveDate,
    /// Open-ended when absent
    #[serde(default)]
    pub valid_to: Option<NaiveDate>,
}

impl PriceRate {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.valid_from <= date && self.valid_to.map_or(true, |end| date <= end)
    }
}

/// Monetary value of a weight, ready to be stored for audit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceCalculation {
    pub final_weight_kg: Decimal,
    pub price_per_kg: Decimal,
    pub gross_value: Decimal,
    /// Equal to `gross_value`; no deductions are applied at this layer
    pub net_value: Decimal,
}

/// Source of the active price for a commodity on a given date
pub trait PriceLookup {
    fn active_price(&self, commodity: Commodity, date: NaiveDate) -> Option<PriceRate>;
}

/// In-memory price list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceList(Vec<PriceRate>);

impl PriceList {
    pub fn new(rates: Vec<PriceRate>) -> Self {
        Self(rates)
    }

    pub fn rates(&self) -> &[PriceRate] {
        &self.0
    }
}

impl PriceLookup for PriceList {
    /// Among the rates active on `date`, the one that started most recently
    fn active_price(&self, commodity: Commodity, date: NaiveDate) -> Option<PriceRate> {
        self.0
            .iter()
            .filter(|rate| rate.commodity == commodity && rate.is_active_on(date))
            .max_by_key(|rate| rate.valid_from)
            .cloned()
    }
}

/// Gross and net value of a weight at a price per kg
///
/// The gross value is rounded half-up to two decimals.
pub fn calculate(
    final_weight_kg: Decimal,
    price_per_kg: Decimal,
) -> EngineResult<PriceCalculation> {
    validate_non_negative("final_weight_kg", final_weight_kg)?;
    if price_per_kg <= Decimal::ZERO {
        return Err(EngineError::NonPositivePrice(price_per_kg));
    }

    let gross_value = final_weight_kg
        .checked_mul(price_per_kg)
        .map(round_currency)
        .ok_or_else(|| EngineError::too_large("final_weight_kg"))?;

    Ok(PriceCalculation {
        final_weight_kg,
        price_per_kg,
        gross_value,
        net_value: gross_value,
    })
}

/// Look up the active price and value the weight with it
pub fn price_with_lookup<L: PriceLookup + ?Sized>(
    lookup: &L,
    commodity: Commodity,
    date: NaiveDate,
    final_weight_kg: Decimal,
) -> EngineResult<PriceCalculation> {
    let rate = lookup
        .active_price(commodity, date)
        .ok_or(EngineError::NoActivePrice { commodity, date })?;
    calculate(final_weight_kg, rate.price_per_kg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn rate(price: &str, from: &str, to: Option<&str>) -> PriceRate {
        PriceRate {
            commodity: Commodity::Cacao,
            price_per_kg: dec(price),
            valid_from: date(from),
            valid_to: to.map(date),
        }
    }

    #[test]
    fn test_calculate_rounds_half_up() {
        let result = calculate(dec("10.5"), dec("0.101")).unwrap();
        // 10.5 * 0.101 = 1.0605
        assert_eq!(result.gross_value, dec("1.06"));

        let result = calculate(dec("1"), dec("2.675")).unwrap();
        assert_eq!(result.gross_value, dec("2.68"));
        assert_eq!(result.net_value, result.gross_value);
    }

    #[test]
    fn test_calculate_zero_weight() {
        let result = calculate(Decimal::ZERO, dec("3.2")).unwrap();
        assert_eq!(result.gross_value, Decimal::ZERO);
    }

    #[test]
    fn test_calculate_rejects_non_positive_price() {
        assert_eq!(
            calculate(dec("10"), Decimal::ZERO),
            Err(EngineError::NonPositivePrice(Decimal::ZERO))
        );
        assert!(calculate(dec("10"), dec("-1")).is_err());
    }

    #[test]
    fn test_calculate_rejects_negative_weight() {
        assert!(matches!(
            calculate(dec("-10"), dec("1")),
            Err(EngineError::NegativeValue { .. })
        ));
    }

    #[test]
    fn test_rate_window_inclusive() {
        let rate = rate("2.50", "2024-01-01", Some("2024-01-31"));
        assert!(rate.is_active_on(date("2024-01-01")));
        assert!(rate.is_active_on(date("2024-01-31")));
        assert!(!rate.is_active_on(date("2024-02-01")));
        assert!(!rate.is_active_on(date("2023-12-31")));
    }

    #[test]
    fn test_latest_active_rate_wins() {
        let prices = PriceList::new(vec![
            rate("2.50", "2024-01-01", None),
            rate("2.80", "2024-03-01", None),
            rate("3.00", "2024-06-01", None),
        ]);
        let active = prices
            .active_price(Commodity::Cacao, date("2024-04-15"))
            .unwrap();
        assert_eq!(active.price_per_kg, dec("2.80"));
    }

    #[test]
    fn test_no_active_price() {
        let prices = PriceList::new(vec![rate("2.50", "2024-01-01", None)]);
        let result = price_with_lookup(&prices, Commodity::Coffee, date("2024-04-15"), dec("100"));
        assert_eq!(
            result,
            Err(EngineError::NoActivePrice {
                commodity: Commodity::Coffee,
                date: date("2024-04-15"),
            })
        );
    }

    #[test]
    fn test_price_with_lookup() {
        let prices = PriceList::new(vec![rate("2.35", "2024-01-01", None)]);
        let result =
            price_with_lookup(&prices, Commodity::Cacao, date("2024-02-01"), dec("870")).unwrap();
        assert_eq!(result.gross_value, dec("2044.50"));
    }

    #[test]
    fn test_huge_value_is_an_error() {
        let result = calculate(Decimal::MAX, dec("2.50"));
        assert_eq!(
            result,
            Err(EngineError::ValueTooLarge("final_weight_kg".to_string()))
        );
    }
}
