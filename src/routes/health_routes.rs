use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Estado del servicio y último resumen del refresco periódico
async fn health(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.snapshot.read().await.clone();
    Json(json!({
        "status": "ok",
        "persistence": state.has_persistence(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "density_snapshot": snapshot,
    }))
}
