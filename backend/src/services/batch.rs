//! Drying batch service: creation, lookup and one-time completion

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{complete_batch, create_batch, Batch, ContributionInput, DriedWeightAllocation};

/// In-memory registry of batches
///
/// Completion runs under the write lock, so a batch can only complete once even
/// when two requests race for it.
#[derive(Clone, Default)]
pub struct BatchRegistry {
    batches: Arc<RwLock<HashMap<Uuid, Batch>>>,
}

impl BatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn batch_count(&self) -> usize {
        self.batches.read().await.len()
    }

    pub async fn open_count(&self) -> usize {
        self.batches
            .read()
            .await
            .values()
            .filter(|batch| !batch.is_completed())
            .count()
    }
}

/// Batch service for pooling receptions into drying batches
#[derive(Clone)]
pub struct BatchService {
    registry: BatchRegistry,
}

/// Input for creating a batch
#[derive(Debug, Deserialize)]
pub struct CreateBatchInput {
    pub contributions: Vec<ContributionInput>,
}

/// Input for completing a batch
#[derive(Debug, Deserialize)]
pub struct CompleteBatchInput {
    pub total_dried_weight_kg: Decimal,
}

/// Result of completing a batch: the updates the caller applies per reception
#[derive(Debug, Serialize)]
pub struct BatchCompletion {
    pub batch_id: Uuid,
    pub total_wet_weight_kg: Decimal,
    pub total_dried_weight_kg: Decimal,
    pub allocations: Vec<DriedWeightAllocation>,
}

impl BatchService {
    /// Create a new BatchService instance
    pub fn new(registry: BatchRegistry) -> Self {
        Self { registry }
    }

    /// Create an open batch from reception contributions
    pub async fn create_batch(&self, input: CreateBatchInput) -> AppResult<Batch> {
        let batch = create_batch(Uuid::new_v4(), &input.contributions)?;

        tracing::info!(
            batch_id = %batch.id,
            receptions = batch.contributions().len(),
            total_wet_weight_kg = %batch.total_wet_weight_kg,
            "Batch created"
        );

        self.registry
            .batches
            .write()
            .await
            .insert(batch.id, batch.clone());

        Ok(batch)
    }

    /// Get batch by ID
    pub async fn get_batch(&self, batch_id: Uuid) -> AppResult<Batch> {
        self.registry
            .batches
            .read()
            .await
            .get(&batch_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Batch".to_string()))
    }

    /// Complete a batch with its measured dried weight
    pub async fn complete_batch(
        &self,
        batch_id: Uuid,
        input: CompleteBatchInput,
    ) -> AppResult<BatchCompletion> {
        let mut batches = self.registry.batches.write().await;
        let batch = batches
            .get_mut(&batch_id)
            .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

        let allocations = complete_batch(batch, input.total_dried_weight_kg)?;

        tracing::info!(
            batch_id = %batch_id,
            status = batch.status.as_str(),
            total_dried_weight_kg = %input.total_dried_weight_kg,
            "Batch completed"
        );

        Ok(BatchCompletion {
            batch_id,
            total_wet_weight_kg: batch.total_wet_weight_kg,
            total_dried_weight_kg: input.total_dried_weight_kg,
            allocations,
        })
    }
}
