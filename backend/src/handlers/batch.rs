//! HTTP handlers for drying batches

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    services::{
        batch::{CompleteBatchInput, CreateBatchInput},
        BatchService,
    },
    AppState,
};

/// Create a batch from reception contributions
pub async fn create_batch(
    State(state): State<AppState>,
    payload: Result<Json<CreateBatchInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let service = BatchService::new(state.batches);
    let batch = service.create_batch(input).await?;
    Ok((StatusCode::CREATED, Json(batch)))
}

/// Get batch by ID
pub async fn get_batch(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(batch_id) = path?;
    let service = BatchService::new(state.batches);
    let batch = service.get_batch(batch_id).await?;
    Ok(Json(batch))
}

/// Complete a batch and return the dried weight allocations
pub async fn complete_batch(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CompleteBatchInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(batch_id) = path?;
    let Json(input) = payload?;
    let service = BatchService::new(state.batches);
    let completion = service.complete_batch(batch_id, input).await?;
    Ok(Json(completion))
}
