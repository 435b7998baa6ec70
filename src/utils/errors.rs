//! Sistema de manejo de errores
//!
//! Este módulo define los tipos de errores del sistema
//! y su conversión a respuestas HTTP. Todas las respuestas de error
//! tienen la forma `{"error": "<mensaje>"}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::repositories::RepositoryError;

pub const NOT_CONFIGURED_MESSAGE: &str = "Service role key not configured";
pub const NO_ROUTE_MESSAGE: &str = "No direct route available between these locations";
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{}", NOT_CONFIGURED_MESSAGE)]
    Configuration,

    #[error("{0}")]
    Validation(String),

    #[error("Invalid fields: {0}")]
    InvalidFields(#[from] validator::ValidationErrors),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("{}", NO_ROUTE_MESSAGE)]
    NoRoute,

    #[error("{0}")]
    NotFound(String),

    #[error("{context}")]
    Persistence {
        context: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl AppError {
    pub fn persistence(context: &'static str, source: RepositoryError) -> Self {
        AppError::Persistence { context, source }
    }

    pub fn missing_fields() -> Self {
        AppError::Validation(MISSING_FIELDS_MESSAGE.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidFields(_) | AppError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            // Los "no encontrado" del dominio salen como 500 por compatibilidad con los clientes
            AppError::Configuration
            | AppError::NoRoute
            | AppError::NotFound(_)
            | AppError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Configuration => error!("❌ Cliente de persistencia no configurado"),
            AppError::Persistence { context, source } => error!("❌ {}: {}", context, source),
            AppError::Validation(msg) => warn!("⚠️ Petición inválida: {}", msg),
            AppError::InvalidFields(e) => warn!("⚠️ Campos inválidos: {}", e),
            AppError::InvalidBody(msg) => warn!("⚠️ Cuerpo inválido: {}", msg),
            AppError::NoRoute | AppError::NotFound(_) => warn!("⚠️ {}", self),
        }

        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(AppError::Configuration.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::missing_fields().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NoRoute.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::NotFound("gone".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_are_public_text() {
        assert_eq!(AppError::Configuration.to_string(), "Service role key not configured");
        assert_eq!(
            AppError::NoRoute.to_string(),
            "No direct route available between these locations"
        );
        let err = AppError::persistence(
            "Error creating safety alert",
            RepositoryError::NotFound("x".into()),
        );
        assert_eq!(err.to_string(), "Error creating safety alert");
    }
}
