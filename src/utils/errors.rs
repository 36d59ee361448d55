//! Sistema de manejo de errores
//!
//! Este módulo define la taxonomía de errores del motor de itinerarios
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::repositories::account_repository::SINGLE_PRIMARY_INDEX;
use crate::services::invariant_validator::{Rule, Violation};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    /// Una regla estructural del dominio fue violada
    #[error("Validation error: {0}")]
    Validation(Violation),

    /// El payload recibido no pasa la validación de campos
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// El recálculo encontró un estado imposible
    #[error("Consistency failure: {0}")]
    Consistency(String),

    /// Bloqueo o serialización fallida; el comando completo puede reintentarse
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Solo los conflictos de concurrencia se reintentan desde la validación
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::ConcurrencyConflict(_))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConcurrencyConflict(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Consistency(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<Violation> for AppError {
    fn from(violation: Violation) -> Self {
        AppError::Validation(violation)
    }
}

/// Clasifica los errores de PostgreSQL según su SQLSTATE
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Requested row does not exist".to_string()),
            sqlx::Error::PoolTimedOut => {
                AppError::ConcurrencyConflict("Timed out waiting for a database connection".to_string())
            }
            sqlx::Error::Database(db_error) => classify_sqlstate(
                db_error.code().as_deref(),
                db_error.constraint(),
                db_error.message(),
            )
            .unwrap_or(AppError::Database(error)),
            _ => AppError::Database(error),
        }
    }
}

/// `None` cuando el código no tiene traducción y el error queda como interno
fn classify_sqlstate(code: Option<&str>, constraint: Option<&str>, message: &str) -> Option<AppError> {
    let name = constraint.unwrap_or("unknown").to_string();
    let classified = match code? {
        // Dos altas simultáneas de cuenta principal sobre una clave sin filas que bloquear
        "23505" if constraint == Some(SINGLE_PRIMARY_INDEX) => {
            AppError::ConcurrencyConflict(format!("Primary account race ({})", name))
        }
        "23505" => AppError::Conflict(format!("Uniqueness violated ({})", name)),
        "23503" if message.starts_with("update or delete") => {
            AppError::Conflict(format!("Row is still referenced ({})", name))
        }
        "23503" => AppError::NotFound(format!("Referenced entity does not exist ({})", name)),
        "23514" => AppError::Validation(Violation::new(Rule::StorageConstraint, name, message.to_string())),
        "22003" => AppError::Validation(Violation::new(
            Rule::StorageConstraint,
            "numeric",
            message.to_string(),
        )),
        "55P03" | "40001" | "40P01" => AppError::ConcurrencyConflict(message.to_string()),
        _ => return None,
    };
    Some(classified)
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<Uuid>,
}

impl ErrorResponse {
    fn specific(error: &str, message: String, details: Option<serde_json::Value>, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details,
            code: code.to_string(),
            correlation_id: None,
        }
    }

    /// Respuesta genérica: el detalle interno solo va al log
    fn generic(error: &str, message: &str, code: &str, correlation_id: Uuid) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            details: None,
            code: code.to_string(),
            correlation_id: Some(correlation_id),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = match self {
            AppError::Validation(violation) => {
                tracing::debug!("Validation error: {}", violation);
                ErrorResponse::specific(
                    "Validation Error",
                    violation.message.clone(),
                    Some(json!({ "rule": violation.rule, "field": violation.field })),
                    "VALIDATION_ERROR",
                )
            }

            AppError::InvalidInput(e) => {
                tracing::debug!("Invalid input: {}", e);
                ErrorResponse::specific(
                    "Invalid Input",
                    "The provided data is invalid".to_string(),
                    Some(json!(e)),
                    "INVALID_INPUT",
                )
            }

            AppError::Conflict(msg) => {
                tracing::debug!("Conflict: {}", msg);
                ErrorResponse::specific("Conflict", msg, None, "CONFLICT")
            }

            AppError::NotFound(msg) => {
                tracing::debug!("Resource not found: {}", msg);
                ErrorResponse::specific("Not Found", msg, None, "NOT_FOUND")
            }

            AppError::Consistency(msg) => {
                let correlation_id = Uuid::new_v4();
                tracing::error!(%correlation_id, "❌ Consistency failure: {}", msg);
                ErrorResponse::generic(
                    "Internal Server Error",
                    "The itinerary could not be recomputed; no changes were applied",
                    "CONSISTENCY_FAILURE",
                    correlation_id,
                )
            }

            AppError::ConcurrencyConflict(msg) => {
                let correlation_id = Uuid::new_v4();
                tracing::warn!(%correlation_id, "⚠️ Concurrency conflict: {}", msg);
                ErrorResponse::generic(
                    "Service Unavailable",
                    "The resource is busy; retry the request",
                    "CONCURRENCY_CONFLICT",
                    correlation_id,
                )
            }

            AppError::Database(e) => {
                let correlation_id = Uuid::new_v4();
                tracing::error!(%correlation_id, "❌ Database error: {}", e);
                ErrorResponse::generic(
                    "Database Error",
                    "An error occurred while accessing the database",
                    "DB_ERROR",
                    correlation_id,
                )
            }

            AppError::Internal(msg) => {
                let correlation_id = Uuid::new_v4();
                tracing::error!(%correlation_id, "❌ Internal error: {}", msg);
                ErrorResponse::generic(
                    "Internal Server Error",
                    "An unexpected error occurred",
                    "INTERNAL_ERROR",
                    correlation_id,
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &Uuid) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}

/// Función helper para crear errores de consistencia
pub fn consistency_error(route_id: &Uuid, message: &str) -> AppError {
    AppError::Consistency(format!("route {}: {}", route_id, message))
}
