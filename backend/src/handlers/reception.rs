//! HTTP handlers for reception settlement

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use shared::{ReceptionSettlement, SettlementRequest};

use crate::{error::AppResult, services::ReceptionService, AppState};

/// Settle a reception with the configured thresholds and prices
pub async fn settle_reception(
    State(state): State<AppState>,
    payload: Result<Json<SettlementRequest>, JsonRejection>,
) -> AppResult<Json<ReceptionSettlement>> {
    let Json(request) = payload?;
    let service = ReceptionService::new(state.config, state.prices);
    let settlement = service.settle(request)?;
    Ok(Json(settlement))
}
