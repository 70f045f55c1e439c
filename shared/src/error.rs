//! Error types for the receiving calculation core

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Commodity, QualityMetric};

/// Broad category of an engine failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Out-of-range or malformed input
    Validation,
    /// Operation not allowed in the current batch state
    InvalidState,
}

/// Errors raised by the discount, batch and pricing calculations
///
/// Failures are deterministic: retrying with the same input yields the same error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("{field} cannot be negative (got {value})")]
    NegativeValue { field: String, value: Decimal },

    #[error("{field} must be between 0 and 100 (got {value})")]
    PercentOutOfRange { field: String, value: Decimal },

    #[error("Unknown quality metric: {0}")]
    UnknownMetric(String),

    #[error("Unknown commodity: {0}")]
    UnknownCommodity(String),

    #[error("Required quality metric missing: {0}")]
    MissingMetric(QualityMetric),

    #[error("More than one enabled threshold for metric {0}")]
    DuplicateThreshold(QualityMetric),

    #[error("Thresholds for {first} and {second} cannot be applied to one reception")]
    MixedCommodityThresholds { first: Commodity, second: Commodity },

    #[error("Lab sample {sample_id} is recorded twice with conflicting {metric} values")]
    ConflictingLabSamples { sample_id: u64, metric: QualityMetric },

    #[error("A batch requires at least one contribution")]
    EmptyBatch,

    #[error("Batch total wet weight must be positive (got {0})")]
    NonPositiveBatchWeight(Decimal),

    #[error("Reception {0} appears more than once in the batch")]
    DuplicateReception(Uuid),

    #[error("{0} is too large to calculate with")]
    ValueTooLarge(String),

    #[error("Price per kg must be positive (got {0})")]
    NonPositivePrice(Decimal),

    #[error("No active price for {commodity} on {date}")]
    NoActivePrice { commodity: Commodity, date: NaiveDate },

    #[error("Batch {0} is already completed")]
    BatchAlreadyCompleted(Uuid),

    #[error("Batch {0} has no contributions")]
    BatchWithoutContributions(Uuid),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::BatchAlreadyCompleted(_) | EngineError::BatchWithoutContributions(_) => {
                ErrorKind::InvalidState
            }
            _ => ErrorKind::Validation,
        }
    }

    /// Input field the error refers to, when there is one
    pub fn field(&self) -> Option<String> {
        match self {
            EngineError::NegativeValue { field, .. }
            | EngineError::PercentOutOfRange { field, .. } => Some(field.clone()),
            EngineError::UnknownMetric(_)
            | EngineError::MissingMetric(_)
            | EngineError::ConflictingLabSamples { .. } => Some("measurements".to_string()),
            EngineError::UnknownCommodity(_) => Some("commodity".to_string()),
            EngineError::DuplicateThreshold(_) | EngineError::MixedCommodityThresholds { .. } => {
                Some("thresholds".to_string())
            }
            EngineError::ValueTooLarge(field) => Some(field.clone()),
            EngineError::EmptyBatch
            | EngineError::NonPositiveBatchWeight(_)
            | EngineError::DuplicateReception(_) => Some("contributions".to_string()),
            EngineError::NonPositivePrice(_) | EngineError::NoActivePrice { .. } => {
                Some("price_per_kg".to_string())
            }
            EngineError::BatchAlreadyCompleted(_) | EngineError::BatchWithoutContributions(_) => {
                None
            }
        }
    }

    pub(crate) fn negative(field: impl Into<String>, value: Decimal) -> Self {
        EngineError::NegativeValue {
            field: field.into(),
            value,
        }
    }

    pub(crate) fn too_large(field: impl Into<String>) -> Self {
        EngineError::ValueTooLarge(field.into())
    }

    pub(crate) fn out_of_range(field: impl Into<String>, value: Decimal) -> Self {
        EngineError::PercentOutOfRange {
            field: field.into(),
            value,
        }
    }
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
