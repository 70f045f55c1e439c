//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub thresholds: usize,
    pub price_rates: usize,
    pub batches: usize,
    pub open_batches: usize,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        thresholds: state.config.receiving.thresholds.len(),
        price_rates: state.prices.rates().len(),
        batches: state.batches.batch_count().await,
        open_batches: state.batches.open_count().await,
    })
}
