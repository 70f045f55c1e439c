//! Quality discount models and the weight discount calculation

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Commodity, QualityMeasurements, QualityMetric};
use crate::error::EngineResult;
use crate::types::{checked_total, percent_of, portion_of};
use crate::validation::{
    validate_measurements, validate_non_negative, validate_single_commodity, validate_thresholds,
};

/// Configured allowance for a quality metric
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountThreshold {
    pub commodity: Commodity,
    pub metric: QualityMetric,
    /// Percentage tolerated before any weight is discounted
    pub threshold_percent: Decimal,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl DiscountThreshold {
    pub fn new(commodity: Commodity, metric: QualityMetric, threshold_percent: Decimal) -> Self {
        Self {
            commodity,
            metric,
            threshold_percent,
            enabled: true,
        }
    }
}

/// Weight deduction for one metric above its threshold
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountBreakdownLine {
    pub metric: QualityMetric,
    pub measured_value: Decimal,
    pub threshold_value: Decimal,
    pub excess_percent: Decimal,
    pub discount_weight_kg: Decimal,
    pub discount_percent_of_total: Decimal,
}

/// Outcome of discounting a reception weight
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightDiscountResult {
    pub original_weight_kg: Decimal,
    pub total_discount_weight_kg: Decimal,
    pub final_weight_kg: Decimal,
    pub combined_discount_percent: Decimal,
    /// One line per metric over threshold, in threshold configuration order
    pub breakdown: Vec<DiscountBreakdownLine>,
}

impl WeightDiscountResult {
    pub fn has_discount(&self) -> bool {
        !self.breakdown.is_empty()
    }

    /// True when the summed discounts exceeded the weight and were capped
    pub fn is_capped(&self) -> bool {
        match checked_total("breakdown", self.breakdown.iter().map(|l| l.discount_weight_kg)) {
            Ok(summed) => summed > self.total_discount_weight_kg,
            Err(_) => true,
        }
    }
}

/// Discount for a single metric
///
/// Only the excess over the threshold is penalized, at 1% of the weight per 1% of
/// excess. A value equal to the threshold is not discounted.
pub fn compute_metric_discount(
    metric: QualityMetric,
    measured_value: Decimal,
    threshold_percent: Decimal,
    total_weight_kg: Decimal,
) -> EngineResult<Option<DiscountBreakdownLine>> {
    validate_non_negative(metric.as_str(), measured_value)?;
    validate_non_negative("threshold_percent", threshold_percent)?;
    validate_non_negative("total_weight_kg", total_weight_kg)?;

    if measured_value <= threshold_percent {
        return Ok(None);
    }

    let excess_percent = measured_value - threshold_percent;
    let discount_weight_kg = portion_of("total_weight_kg", total_weight_kg, excess_percent)?;

    Ok(Some(DiscountBreakdownLine {
        metric,
        measured_value,
        threshold_value: threshold_percent,
        excess_percent,
        discount_weight_kg,
        discount_percent_of_total: percent_of(
            "total_weight_kg",
            discount_weight_kg,
            total_weight_kg,
        )?,
    }))
}

/// Apply every enabled threshold to the measurements
///
/// `thresholds` must all belong to the reception's commodity; see [`thresholds_for`].
///
/// Discounts from different metrics are added together as if they were separate
/// physical weight. This is an approximation: humidity and mold losses can overlap.
/// Only the total is capped at the original weight, individual lines are not.
pub fn compute_weight_discounts(
    total_weight_kg: Decimal,
    thresholds: &[DiscountThreshold],
    measurements: &QualityMeasurements,
) -> EngineResult<WeightDiscountResult> {
    validate_non_negative("total_weight_kg", total_weight_kg)?;
    validate_measurements(measurements)?;
    validate_thresholds(thresholds)?;
    validate_single_commodity(thresholds)?;

    let mut breakdown = Vec::new();
    for threshold in thresholds.iter().filter(|t| t.enabled) {
        let Some(measured) = measurements.get(threshold.metric) else {
            continue;
        };
        if let Some(line) = compute_metric_discount(
            threshold.metric,
            measured,
            threshold.threshold_percent,
            total_weight_kg,
        )? {
            breakdown.push(line);
        }
    }

    let summed = checked_total(
        "total_weight_kg",
        breakdown.iter().map(|line| line.discount_weight_kg),
    )?;
    let total_discount_weight_kg = summed.min(total_weight_kg);
    let final_weight_kg = (total_weight_kg - total_discount_weight_kg).max(Decimal::ZERO);

    Ok(WeightDiscountResult {
        original_weight_kg: total_weight_kg,
        total_discount_weight_kg,
        final_weight_kg,
        combined_discount_percent: percent_of(
            "total_weight_kg",
            total_discount_weight_kg,
            total_weight_kg,
        )?,
        breakdown,
    })
}

/// Enabled thresholds for one commodity, in configuration order
pub fn thresholds_for(
    commodity: Commodity,
    thresholds: &[DiscountThreshold],
) -> Vec<DiscountThreshold> {
    thresholds
        .iter()
        .filter(|t| t.commodity == commodity && t.enabled)
        .cloned()
        .collect()
}
