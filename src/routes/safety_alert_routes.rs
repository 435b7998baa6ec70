use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;

use crate::controllers::safety_alert_controller::SafetyAlertController;
use crate::dto::alert_dto::{CreateAlertRequest, DeleteAlertQuery, DeleteAlertResponse};
use crate::models::alert::SafetyAlert;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiJson;

pub fn create_safety_alert_router() -> Router<AppState> {
    Router::new().route(
        "/api/safety-alerts",
        get(list_alerts).post(create_alert).delete(delete_alert),
    )
}

fn controller(state: &AppState) -> Result<SafetyAlertController, AppError> {
    let persistence = state.persistence()?;
    Ok(SafetyAlertController::new(persistence.alerts.clone()))
}

async fn list_alerts(State(state): State<AppState>) -> Result<Json<Vec<SafetyAlert>>, AppError> {
    let alerts = controller(&state)?.list(Utc::now()).await?;
    Ok(Json(alerts))
}

async fn create_alert(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateAlertRequest>,
) -> Result<Json<Vec<SafetyAlert>>, AppError> {
    let created = controller(&state)?.create(request, Utc::now()).await?;
    Ok(Json(created))
}

async fn delete_alert(
    State(state): State<AppState>,
    Query(query): Query<DeleteAlertQuery>,
) -> Result<Json<DeleteAlertResponse>, AppError> {
    controller(&state)?.delete(query).await?;
    Ok(Json(DeleteAlertResponse { success: true }))
}
