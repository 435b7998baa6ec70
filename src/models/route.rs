//! Modelo de ruta
//!
//! Resultado efímero: se calcula por petición y nunca se persiste.

use serde::Serialize;

use super::density::DensityLevel;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteResult {
    pub start: String,
    pub destination: String,
    pub distance_km: f64,
    pub duration_minutes: u32,
    pub congestion_level: DensityLevel,
    pub directions: Vec<String>,
}
