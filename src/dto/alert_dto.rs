use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::density::Coordinates;

// Request para crear una alerta; todos los campos son obligatorios
// pero se reciben como opcionales para responder 400 y no 422
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateAlertRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 2000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub location_name: Option<String>,

    #[validate]
    pub coordinates: Option<Coordinates>,

    pub severity: Option<String>,

    pub expires_at: Option<String>,
}

// Query de DELETE /api/safety-alerts
#[derive(Debug, Default, Deserialize)]
pub struct DeleteAlertQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteAlertResponse {
    pub success: bool,
}
