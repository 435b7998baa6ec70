//! Panel de monitorización de multitudes
//!
//! API HTTP que sirve lecturas simuladas de densidad por ubicación,
//! rutas con tiempos de marcha según la congestión y alertas de seguridad.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::Router;
use tower_http::trace::TraceLayer;

use middleware::cors::cors_layer;
use state::AppState;

/// Router completo con sus capas, listo para `axum::serve`
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    routes::create_api_router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
