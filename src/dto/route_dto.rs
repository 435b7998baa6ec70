use serde::{Deserialize, Serialize};

use crate::models::density::DensityLevel;
use crate::models::route::RouteResult;

// Query de GET /api/routes
#[derive(Debug, Default, Deserialize)]
pub struct RouteQuery {
    pub start: Option<String>,
    pub destination: Option<String>,
}

// Response de ruta: conserva los campos de texto que consume el mapa
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub start: String,
    pub destination: String,
    pub distance: String,
    pub duration: String,
    pub distance_km: f64,
    pub duration_minutes: u32,
    pub congestion_level: DensityLevel,
    pub directions: Vec<String>,
}

impl From<RouteResult> for RouteResponse {
    fn from(route: RouteResult) -> Self {
        Self {
            distance: format!("{:.1} km", route.distance_km),
            duration: format!("{} minutes", route.duration_minutes),
            start: route.start,
            destination: route.destination,
            distance_km: route.distance_km,
            duration_minutes: route.duration_minutes,
            congestion_level: route.congestion_level,
            directions: route.directions,
        }
    }
}
