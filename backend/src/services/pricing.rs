//! Pricing service: explicit price or configured price list

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use shared::{calculate, price_with_lookup, Commodity, PriceCalculation, PriceList};

/// Pricing service
#[derive(Clone)]
pub struct PricingService {
    prices: Arc<PriceList>,
}

/// Input for a price calculation
///
/// An explicit `price_per_kg` wins; otherwise the price active for
/// `commodity` on `date` is looked up.
#[derive(Debug, Deserialize)]
pub struct CalculatePriceInput {
    pub final_weight_kg: Decimal,
    pub price_per_kg: Option<Decimal>,
    pub commodity: Option<Commodity>,
    pub date: Option<NaiveDate>,
}

impl PricingService {
    /// Create a new PricingService instance
    pub fn new(prices: Arc<PriceList>) -> Self {
        Self { prices }
    }

    /// Value a final weight
    pub fn calculate(&self, input: CalculatePriceInput) -> AppResult<PriceCalculation> {
        let calculation = match (input.price_per_kg, input.commodity, input.date) {
            (Some(price_per_kg), _, _) => calculate(input.final_weight_kg, price_per_kg)?,
            (None, Some(commodity), Some(date)) => {
                price_with_lookup(self.prices.as_ref(), commodity, date, input.final_weight_kg)?
            }
            _ => {
                return Err(AppError::validation(
                    "price_per_kg",
                    "Provide price_per_kg, or commodity and date to look up a price",
                    "Indique price_per_kg, o el producto y la fecha para buscar un precio",
                ))
            }
        };

        tracing::debug!(
            final_weight_kg = %calculation.final_weight_kg,
            price_per_kg = %calculation.price_per_kg,
            gross_value = %calculation.gross_value,
            "Price calculated"
        );

        Ok(calculation)
    }
}
