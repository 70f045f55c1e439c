//! Route definitions for the Commodity Receiving Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/discounts/calculate", post(handlers::calculate_discount))
        .route("/quality/combine", post(handlers::combine_quality))
        .route("/pricing/calculate", post(handlers::calculate_price))
        .route("/receptions/settle", post(handlers::settle_reception))
        .nest("/batches", batch_routes())
}

/// Drying batch routes
fn batch_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_batch))
        .route("/:batch_id", get(handlers::get_batch))
        .route("/:batch_id/complete", post(handlers::complete_batch))
}
