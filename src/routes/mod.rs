pub mod crowd_density_routes;
pub mod health_routes;
pub mod navigation_routes;
pub mod safety_alert_routes;

use axum::Router;
use crate::state::AppState;

/// Crear el router principal de la API
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(health_routes::create_health_router())
        .merge(crowd_density_routes::create_crowd_density_router())
        .merge(navigation_routes::create_navigation_router())
        .merge(safety_alert_routes::create_safety_alert_router())
}
