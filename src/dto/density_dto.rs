use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::density::{Coordinates, DensityReading, SectionReading};

// Query de GET /api/crowd-density
#[derive(Debug, Default, Deserialize)]
pub struct CrowdDensityQuery {
    pub force: Option<String>,
}

impl CrowdDensityQuery {
    pub fn is_forced(&self) -> bool {
        self.force.as_deref() == Some("true")
    }
}

// Body de POST /api/crowd-density: recálculo o entrada manual
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CrowdDensityPostRequest {
    pub recalculate: Option<bool>,

    #[validate(length(min = 1, max = 200))]
    pub location_name: Option<String>,

    #[validate]
    pub coordinates: Option<Coordinates>,

    pub density_level: Option<String>,

    #[validate(range(min = 0))]
    pub crowd_size: Option<i64>,

    #[validate(range(min = 0.0))]
    pub occupancy_percentage: Option<f64>,

    #[validate(range(min = 0.0))]
    pub density: Option<f64>,

    #[validate(range(min = 0))]
    pub capacity: Option<i64>,

    pub sections: Option<Vec<SectionReading>>,
}

impl CrowdDensityPostRequest {
    pub fn is_recalculation(&self) -> bool {
        self.recalculate == Some(true)
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RecalculateResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CrowdDensityPostResponse {
    Recalculated(RecalculateResponse),
    Stored(Vec<DensityReading>),
}
