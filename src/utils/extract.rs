//! Extractores de la API
//!
//! `ApiJson` sustituye a `axum::Json` en los handlers para que un cuerpo
//! mal formado responda con `AppError` y no con el rechazo en texto plano.

use axum::extract::FromRequest;
use axum::Json;

use super::errors::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

