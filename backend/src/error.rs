//! Error handling for the Commodity Receiving Platform
//!
//! Provides consistent error responses in Spanish and English

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{EngineError, ErrorKind};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_es: String,
    },

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Invalid state transition: {message}")]
    InvalidStateTransition { message: String, message_es: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    pub fn validation(field: &str, message: &str, message_es: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
            message_es: message_es.to_string(),
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        let message_es = spanish_message(&err);
        match err.kind() {
            ErrorKind::Validation => AppError::Validation {
                field: err.field().unwrap_or_else(|| "input".to_string()),
                message: err.to_string(),
                message_es,
            },
            ErrorKind::InvalidState => AppError::InvalidStateTransition {
                message: err.to_string(),
                message_es,
            },
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        let message = rejection.body_text();
        AppError::Validation {
            field: "path".to_string(),
            message_es: format!("Ruta inválida: {}", message),
            message,
        }
    }
}

/// Spanish rendering of an engine error for receiving station operators
fn spanish_message(err: &EngineError) -> String {
    match err {
        EngineError::NegativeValue { field, value } => {
            format!("{} no puede ser negativo (valor: {})", field, value)
        }
        EngineError::PercentOutOfRange { field, value } => {
            format!("{} debe estar entre 0 y 100 (valor: {})", field, value)
        }
        EngineError::UnknownMetric(name) => format!("Métrica de calidad desconocida: {}", name),
        EngineError::UnknownCommodity(name) => format!("Producto desconocido: {}", name),
        EngineError::MissingMetric(metric) => {
            format!("Falta la métrica de calidad requerida: {}", metric)
        }
        EngineError::DuplicateThreshold(metric) => {
            format!("Hay más de un umbral activo para {}", metric)
        }
        EngineError::MixedCommodityThresholds { first, second } => format!(
            "Los umbrales de {} y {} no se pueden aplicar a una misma recepción",
            first.as_str(),
            second.as_str()
        ),
        EngineError::ConflictingLabSamples { sample_id, metric } => format!(
            "La muestra de laboratorio {} está duplicada con valores distintos de {}",
            sample_id, metric
        ),
        EngineError::EmptyBatch => "El lote debe tener al menos una recepción".to_string(),
        EngineError::NonPositiveBatchWeight(total) => {
            format!("El peso húmedo total del lote debe ser positivo (valor: {})", total)
        }
        EngineError::DuplicateReception(id) => {
            format!("La recepción {} aparece más de una vez en el lote", id)
        }
        EngineError::ValueTooLarge(field) => {
            format!("{} es demasiado grande para calcular", field)
        }
        EngineError::NonPositivePrice(price) => {
            format!("El precio por kg debe ser positivo (valor: {})", price)
        }
        EngineError::NoActivePrice { commodity, date } => format!(
            "No hay precio vigente para {} en la fecha {}",
            commodity.as_str(),
            date
        ),
        EngineError::BatchAlreadyCompleted(id) => format!("El lote {} ya fue completado", id),
        EngineError::BatchWithoutContributions(id) => {
            format!("El lote {} no tiene recepciones", id)
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation {
                field,
                message,
                message_es,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_es: message_es.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::MalformedBody(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_es: format!("Datos inválidos: {}", msg),
                    field: Some("body".to_string()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_es: format!("No se encontró {}", resource),
                    field: None,
                },
            ),
            AppError::InvalidStateTransition {
                message,
                message_es,
            } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "INVALID_STATE_TRANSITION".to_string(),
                    message_en: message.clone(),
                    message_es: message_es.clone(),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: format!("Configuration error: {}", msg),
                    message_es: format!("Error de configuración: {}", msg),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_validation_engine_error_maps_to_bad_request() {
        let err: AppError = EngineError::EmptyBatch.into();
        assert!(matches!(&err, AppError::Validation { field, .. } if field == "contributions"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_state_maps_to_conflict() {
        let err: AppError = EngineError::BatchAlreadyCompleted(Uuid::nil()).into();
        assert!(matches!(err, AppError::InvalidStateTransition { .. }));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_spanish_message_present() {
        let err: AppError = EngineError::NonPositivePrice(rust_decimal::Decimal::ZERO).into();
        match err {
            AppError::Validation { message_es, .. } => {
                assert!(message_es.contains("precio por kg"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_mixed_commodity_thresholds_map_to_bad_request() {
        let err: AppError = EngineError::MixedCommodityThresholds {
            first: shared::Commodity::Cacao,
            second: shared::Commodity::Coffee,
        }
        .into();
        match &err {
            AppError::Validation {
                field, message_es, ..
            } => {
                assert_eq!(field, "thresholds");
                assert!(message_es.contains("cacao"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
