//! HTTP handlers for pricing

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use shared::PriceCalculation;

use crate::{
    error::AppResult,
    services::{pricing::CalculatePriceInput, PricingService},
    AppState,
};

/// Value a final weight at an explicit or configured price
pub async fn calculate_price(
    State(state): State<AppState>,
    payload: Result<Json<CalculatePriceInput>, JsonRejection>,
) -> AppResult<Json<PriceCalculation>> {
    let Json(input) = payload?;
    let service = PricingService::new(state.prices);
    let calculation = service.calculate(input)?;
    Ok(Json(calculation))
}
