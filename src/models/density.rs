//! Modelo de densidad de multitudes
//!
//! Una lectura vigente por ubicación. Mapea a la tabla `crowd_density`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Umbrales en personas por metro cuadrado, inclusivos por abajo.
pub const LOW_THRESHOLD: f64 = 0.5;
pub const MEDIUM_THRESHOLD: f64 = 1.0;
pub const HIGH_THRESHOLD: f64 = 2.0;

/// Nivel de densidad - mapea al ENUM density_level.
/// El orden de declaración es el orden de gravedad.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[sqlx(type_name = "density_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DensityLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl DensityLevel {
    pub const ALL: [DensityLevel; 4] = [
        DensityLevel::Low,
        DensityLevel::Medium,
        DensityLevel::High,
        DensityLevel::Critical,
    ];

    /// Clasifica una densidad: <=0.5 low, <=1.0 medium, <=2.0 high, resto critical.
    pub fn from_density(density: f64) -> Self {
        if density <= LOW_THRESHOLD {
            DensityLevel::Low
        } else if density <= MEDIUM_THRESHOLD {
            DensityLevel::Medium
        } else if density <= HIGH_THRESHOLD {
            DensityLevel::High
        } else {
            DensityLevel::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DensityLevel::Low => "low",
            DensityLevel::Medium => "medium",
            DensityLevel::High => "high",
            DensityLevel::Critical => "critical",
        }
    }

    pub fn is_congested(&self) -> bool {
        matches!(self, DensityLevel::High | DensityLevel::Critical)
    }
}

impl fmt::Display for DensityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DensityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(DensityLevel::Low),
            "medium" => Ok(DensityLevel::Medium),
            "high" => Ok(DensityLevel::High),
            "critical" => Ok(DensityLevel::Critical),
            other => Err(format!("unknown density level '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Validate)]
pub struct Coordinates {
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
}

/// Desglose de una sección dentro de una lectura
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionReading {
    pub id: String,
    pub name: String,
    pub density: f64,
    pub density_level: DensityLevel,
    pub crowd_size: i64,
}

/// Lectura de densidad vigente para una ubicación.
/// Los campos numéricos son opcionales porque las entradas manuales
/// solo exigen nombre, coordenadas y nivel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DensityReading {
    pub location_name: String,
    pub coordinates: Coordinates,
    pub density_level: DensityLevel,
    pub density: Option<f64>,
    pub crowd_size: Option<i64>,
    pub capacity: Option<i64>,
    pub occupancy_percentage: Option<f64>,
    #[serde(default)]
    pub sections: Vec<SectionReading>,
    pub updated_at: DateTime<Utc>,
}

/// Fila tal como vive en PostgreSQL
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DensityReadingRow {
    pub id: i64,
    pub location_name: String,
    pub lng: f64,
    pub lat: f64,
    pub density_level: DensityLevel,
    pub density: Option<f64>,
    pub crowd_size: Option<i64>,
    pub capacity: Option<i64>,
    pub occupancy_percentage: Option<f64>,
    pub sections: sqlx::types::Json<Vec<SectionReading>>,
    pub updated_at: DateTime<Utc>,
}

impl From<DensityReadingRow> for DensityReading {
    fn from(row: DensityReadingRow) -> Self {
        Self {
            location_name: row.location_name,
            coordinates: Coordinates { lng: row.lng, lat: row.lat },
            density_level: row.density_level,
            density: row.density,
            crowd_size: row.crowd_size,
            capacity: row.capacity,
            occupancy_percentage: row.occupancy_percentage,
            sections: row.sections.0,
            updated_at: row.updated_at,
        }
    }
}
