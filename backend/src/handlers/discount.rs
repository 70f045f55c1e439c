//! HTTP handlers for weight discounts and quality merging

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use shared::{QualityMeasurements, WeightDiscountResult};

use crate::{
    error::AppResult,
    services::discount::{CalculateDiscountInput, CombineQualityInput},
    services::DiscountService,
    AppState,
};

/// Compute weight discounts for a reception
pub async fn calculate_discount(
    State(state): State<AppState>,
    payload: Result<Json<CalculateDiscountInput>, JsonRejection>,
) -> AppResult<Json<WeightDiscountResult>> {
    let Json(input) = payload?;
    let service = DiscountService::new(state.config);
    let result = service.calculate(input)?;
    Ok(Json(result))
}

/// Merge field measurements with lab samples
pub async fn combine_quality(
    State(state): State<AppState>,
    payload: Result<Json<CombineQualityInput>, JsonRejection>,
) -> AppResult<Json<QualityMeasurements>> {
    let Json(input) = payload?;
    let service = DiscountService::new(state.config);
    let merged = service.combine(input)?;
    Ok(Json(merged))
}
