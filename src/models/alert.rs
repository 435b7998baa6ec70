//! Modelo de alertas de seguridad
//!
//! Mapea a la tabla `safety_alerts`. Las alertas caducadas se quedan en
//! la tabla, solo se filtran en las lecturas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use uuid::Uuid;

use super::density::Coordinates;

/// Severidad - mapea al ENUM alert_severity (orden de declaración = gravedad)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, PartialOrd, Ord)]
#[sqlx(type_name = "alert_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(AlertSeverity::Low),
            "medium" => Ok(AlertSeverity::Medium),
            "high" => Ok(AlertSeverity::High),
            "critical" => Ok(AlertSeverity::Critical),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafetyAlert {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location_name: String,
    pub coordinates: Coordinates,
    pub severity: AlertSeverity,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SafetyAlert {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Campos validados para crear una alerta
#[derive(Debug, Clone, PartialEq)]
pub struct NewSafetyAlert {
    pub title: String,
    pub description: String,
    pub location_name: String,
    pub coordinates: Coordinates,
    pub severity: AlertSeverity,
    pub expires_at: DateTime<Utc>,
}

/// Fila tal como vive en PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct SafetyAlertRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location_name: String,
    pub lng: f64,
    pub lat: f64,
    pub severity: AlertSeverity,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<SafetyAlertRow> for SafetyAlert {
    fn from(row: SafetyAlertRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            location_name: row.location_name,
            coordinates: Coordinates { lng: row.lng, lat: row.lat },
            severity: row.severity,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}
