//! Input validation for the receiving calculations
//!
//! Everything the engines accept passes through here first, so out-of-range values
//! surface as `EngineError`s instead of being clamped silently.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{DiscountThreshold, QualityMeasurements};
use crate::types::{hundred, percentage_tolerance};

// ============================================================================
// Numeric Validations
// ============================================================================

/// Validate that a weight or rate is not negative
pub fn validate_non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(EngineError::negative(field, value));
    }
    Ok(())
}

/// Validate that a percentage is within [0, 100]
pub fn validate_percentage(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO || value > hundred() {
        return Err(EngineError::out_of_range(field, value));
    }
    Ok(())
}

/// Validate that percentage shares sum to 100 within tolerance
pub fn validate_percentage_shares(shares: &[Decimal]) -> EngineResult<()> {
    let total: Decimal = shares.iter().sum();
    if (total - hundred()).abs() > percentage_tolerance() {
        return Err(EngineError::out_of_range("percentage_of_total", total));
    }
    Ok(())
}

// ============================================================================
// Quality Validations
// ============================================================================

/// Validate every measured value is a percentage
pub fn validate_measurements(measurements: &QualityMeasurements) -> EngineResult<()> {
    for (metric, value) in measurements.iter() {
        validate_percentage(metric.as_str(), value)?;
    }
    Ok(())
}

/// Validate a threshold configuration snapshot
///
/// At most one enabled threshold may exist per commodity and metric.
pub fn validate_thresholds(thresholds: &[DiscountThreshold]) -> EngineResult<()> {
    let mut seen = HashSet::new();
    for threshold in thresholds {
        validate_percentage("threshold_percent", threshold.threshold_percent)?;
        if threshold.enabled && !seen.insert((threshold.commodity, threshold.metric)) {
            return Err(EngineError::DuplicateThreshold(threshold.metric));
        }
    }
    Ok(())
}

/// Validate that a threshold set belongs to a single commodity
///
/// A reception is one commodity, so a mixed set would discount the same metric
/// once per commodity.
pub fn validate_single_commodity(thresholds: &[DiscountThreshold]) -> EngineResult<()> {
    let Some(first) = thresholds.first() else {
        return Ok(());
    };
    match thresholds.iter().find(|t| t.commodity != first.commodity) {
        Some(other) => Err(EngineError::MixedCommodityThresholds {
            first: first.commodity,
            second: other.commodity,
        }),
        None => Ok(()),
    }
}
