use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;

use crate::controllers::crowd_density_controller::CrowdDensityController;
use crate::dto::density_dto::{CrowdDensityPostRequest, CrowdDensityPostResponse, CrowdDensityQuery};
use crate::models::density::DensityReading;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiJson;

pub fn create_crowd_density_router() -> Router<AppState> {
    Router::new().route(
        "/api/crowd-density",
        get(get_crowd_density).post(post_crowd_density),
    )
}

async fn get_crowd_density(
    State(state): State<AppState>,
    Query(query): Query<CrowdDensityQuery>,
) -> Result<Json<Vec<DensityReading>>, AppError> {
    state.persistence()?;
    let controller = CrowdDensityController::new(state.densities.clone());
    let readings = controller.list(query.is_forced(), Utc::now()).await;
    Ok(Json(readings))
}

async fn post_crowd_density(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CrowdDensityPostRequest>,
) -> Result<Json<CrowdDensityPostResponse>, AppError> {
    state.persistence()?;
    let controller = CrowdDensityController::new(state.densities.clone());
    let response = controller.post(request, Utc::now()).await?;
    Ok(Json(response))
}
