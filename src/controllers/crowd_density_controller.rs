use chrono::{DateTime, Utc};
use tracing::info;
use validator::Validate;

use crate::dto::density_dto::{CrowdDensityPostRequest, CrowdDensityPostResponse, RecalculateResponse};
use crate::models::density::{DensityLevel, DensityReading};
use crate::services::density_service::DensityService;
use crate::utils::errors::{AppError, AppResult};

const UPDATE_FAILED: &str = "Error updating crowd density data";

pub struct CrowdDensityController {
    service: DensityService,
}

impl CrowdDensityController {
    pub fn new(service: DensityService) -> Self {
        Self { service }
    }

    pub async fn list(&self, force: bool, now: DateTime<Utc>) -> Vec<DensityReading> {
        if force {
            info!("🔄 Refresco forzado de densidades");
        }
        self.service.current(now, force).await
    }

    pub async fn post(
        &self,
        request: CrowdDensityPostRequest,
        now: DateTime<Utc>,
    ) -> AppResult<CrowdDensityPostResponse> {
        if request.is_recalculation() {
            let count = self
                .service
                .force_recompute(now)
                .await
                .map_err(|e| AppError::persistence(UPDATE_FAILED, e))?;

            return Ok(CrowdDensityPostResponse::Recalculated(RecalculateResponse {
                success: true,
                message: "Crowd density data recalculated".to_string(),
                count,
            }));
        }

        let reading = manual_reading(request, now)?;
        info!("✍️ Entrada manual para {}", reading.location_name);
        let stored = self
            .service
            .upsert(reading)
            .await
            .map_err(|e| AppError::persistence(UPDATE_FAILED, e))?;

        Ok(CrowdDensityPostResponse::Stored(vec![stored]))
    }
}

fn manual_reading(request: CrowdDensityPostRequest, now: DateTime<Utc>) -> AppResult<DensityReading> {
    let (Some(location_name), Some(coordinates), Some(level)) = (
        request.location_name.clone().filter(|name| !name.trim().is_empty()),
        request.coordinates,
        request.density_level.as_deref(),
    ) else {
        return Err(AppError::missing_fields());
    };

    request.validate()?;
    let density_level: DensityLevel = level.parse().map_err(AppError::Validation)?;

    Ok(DensityReading {
        location_name,
        coordinates,
        density_level,
        density: request.density,
        crowd_size: request.crowd_size,
        capacity: request.capacity,
        occupancy_percentage: request.occupancy_percentage,
        sections: request.sections.unwrap_or_default(),
        updated_at: now,
    })
}
