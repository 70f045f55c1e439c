//! Weight discount and quality merge service

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::{
    combine_quality_metrics, compute_weight_discounts, thresholds_for, Commodity,
    DiscountThreshold, LabSample, QualityMeasurements, WeightDiscountResult,
};

/// Discount service backed by the configured threshold snapshot
#[derive(Clone)]
pub struct DiscountService {
    config: Arc<Config>,
}

/// Input for a discount calculation
///
/// Explicit `thresholds` take precedence over the configured set for `commodity`.
#[derive(Debug, Deserialize)]
pub struct CalculateDiscountInput {
    pub commodity: Option<Commodity>,
    pub thresholds: Option<Vec<DiscountThreshold>>,
    pub total_weight_kg: Decimal,
    #[serde(default)]
    pub measurements: QualityMeasurements,
}

/// Input for merging field and lab measurements
#[derive(Debug, Deserialize)]
pub struct CombineQualityInput {
    #[serde(default)]
    pub field_measurements: QualityMeasurements,
    #[serde(default)]
    pub lab_samples: Vec<LabSample>,
}

impl DiscountService {
    /// Create a new DiscountService instance
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Compute weight discounts for one reception
    pub fn calculate(&self, input: CalculateDiscountInput) -> AppResult<WeightDiscountResult> {
        let thresholds = match (input.thresholds, input.commodity) {
            (Some(thresholds), Some(commodity)) => thresholds_for(commodity, &thresholds),
            (Some(thresholds), None) => thresholds,
            (None, Some(commodity)) => thresholds_for(commodity, &self.config.receiving.thresholds),
            (None, None) => {
                return Err(AppError::validation(
                    "thresholds",
                    "Either thresholds or a commodity must be provided",
                    "Debe indicar los umbrales o el producto",
                ))
            }
        };

        let result =
            compute_weight_discounts(input.total_weight_kg, &thresholds, &input.measurements)?;

        tracing::debug!(
            original_weight_kg = %result.original_weight_kg,
            total_discount_weight_kg = %result.total_discount_weight_kg,
            lines = result.breakdown.len(),
            capped = result.is_capped(),
            "Weight discounts computed"
        );

        Ok(result)
    }

    /// Merge field measurements with lab samples
    pub fn combine(&self, input: CombineQualityInput) -> AppResult<QualityMeasurements> {
        let merged = combine_quality_metrics(&input.field_measurements, &input.lab_samples)?;
        tracing::debug!(
            samples = input.lab_samples.len(),
            metrics = merged.len(),
            "Quality metrics combined"
        );
        Ok(merged)
    }
}
