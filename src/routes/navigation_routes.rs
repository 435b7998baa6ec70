use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;

use crate::controllers::route_controller::RouteController;
use crate::dto::route_dto::{RouteQuery, RouteResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_navigation_router() -> Router<AppState> {
    Router::new().route("/api/routes", get(calculate_route))
}

// Excepción deliberada a la regla de 500 sin cliente privilegiado:
// sin él la congestión se calcula al vuelo
async fn calculate_route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteResponse>, AppError> {
    if !state.has_persistence() {
        tracing::warn!("⚠️ Cliente de persistencia no configurado, rutas con cálculo directo");
    }
    let controller = RouteController::new(state.routes.clone());
    let response = controller.calculate(query, Utc::now()).await?;
    Ok(Json(response))
}
