//! Cálculo de rutas con congestión
//!
//! Solo existen tramos directos entre las cinco ubicaciones principales.
//! La congestión de la ruta es el peor nivel de sus dos extremos y fija el
//! multiplicador de velocidad de marcha.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::info;

use crate::models::density::{DensityLevel, DensityReading};
use crate::models::location::{ARAFAT, JAMARAAT_BRIDGE, MASJID_AL_HARAM, MINA, MUZDALIFAH};
use crate::models::route::RouteResult;
use crate::services::density_service::DensityService;
use crate::utils::errors::{AppError, AppResult};

/// Velocidad media a pie en km/h
pub const BASE_WALKING_SPEED_KMH: f64 = 4.0;

/// Tramos directos en km; la tabla es simétrica por construcción.
/// La mezquita y Arafat no tienen tramo directo.
const DISTANCES_KM: &[(&str, &str, f64)] = &[
    (MASJID_AL_HARAM, MINA, 6.2),
    (MASJID_AL_HARAM, MUZDALIFAH, 12.8),
    (MASJID_AL_HARAM, JAMARAAT_BRIDGE, 7.1),
    (MINA, ARAFAT, 14.3),
    (MINA, MUZDALIFAH, 3.5),
    (MINA, JAMARAAT_BRIDGE, 1.8),
    (ARAFAT, MUZDALIFAH, 8.2),
    (ARAFAT, JAMARAAT_BRIDGE, 16.1),
    (MUZDALIFAH, JAMARAAT_BRIDGE, 5.3),
];

pub fn direct_distance_km(start: &str, destination: &str) -> Option<f64> {
    DISTANCES_KM.iter().find_map(|&(a, b, km)| {
        ((a == start && b == destination) || (a == destination && b == start)).then_some(km)
    })
}

pub fn speed_multiplier(congestion: DensityLevel) -> f64 {
    match congestion {
        DensityLevel::Low => 1.0,
        DensityLevel::Medium => 0.8,
        DensityLevel::High => 0.6,
        DensityLevel::Critical => 0.4,
    }
}

pub fn walking_minutes(distance_km: f64, congestion: DensityLevel) -> u32 {
    let speed = BASE_WALKING_SPEED_KMH * speed_multiplier(congestion);
    (distance_km / speed * 60.0).ceil() as u32
}

#[derive(Clone)]
pub struct RouteService {
    densities: DensityService,
}

impl RouteService {
    pub fn new(densities: DensityService) -> Self {
        Self { densities }
    }

    pub async fn route(
        &self,
        start: &str,
        destination: &str,
        now: DateTime<Utc>,
    ) -> AppResult<RouteResult> {
        let readings = self.densities.current(now, false).await;
        plan_route(start, destination, &readings)
    }
}

/// Calcula la ruta a partir de un conjunto de lecturas ya obtenido
pub fn plan_route(
    start: &str,
    destination: &str,
    readings: &[DensityReading],
) -> AppResult<RouteResult> {
    let distance_km = direct_distance_km(start, destination).ok_or(AppError::NoRoute)?;

    let levels: HashMap<&str, DensityLevel> = readings
        .iter()
        .map(|reading| (reading.location_name.as_str(), reading.density_level))
        .collect();
    // Sin lectura se asume "low"
    let level_of = |name: &str| levels.get(name).copied().unwrap_or(DensityLevel::Low);

    let start_level = level_of(start);
    let destination_level = level_of(destination);
    let congestion = start_level.max(destination_level);

    info!(
        "🧭 Ruta {} ({}) -> {} ({}): congestión {}",
        start, start_level, destination, destination_level, congestion
    );

    let mut directions = vec![format!("Start at {}", start)];

    if start_level.is_congested() || destination_level.is_congested() {
        let warning = if start_level == DensityLevel::Critical {
            format!(
                "⚠️ Warning: Extremely high crowd density at your starting point ({})",
                start
            )
        } else if destination_level == DensityLevel::Critical {
            format!(
                "⚠️ Warning: Extremely high crowd density at your destination ({})",
                destination
            )
        } else if congestion == DensityLevel::Critical {
            "⚠️ Warning: Extremely high crowd density on this route".to_string()
        } else {
            "⚠️ Warning: High crowd density detected on this route".to_string()
        };
        directions.push(warning);
        directions.push("Consider traveling during off-peak hours if possible".to_string());
    }

    directions.push(format!("Head toward {}", destination));

    if start == MINA && destination == JAMARAAT_BRIDGE {
        directions
            .push("Take the designated pathway following the crowd management barriers".to_string());
        if level_of(JAMARAAT_BRIDGE).is_congested() {
            directions.push(
                "Follow signs for your camp's designated time slot to avoid peak congestion"
                    .to_string(),
            );
        }
    } else if start == MASJID_AL_HARAM && destination == MINA {
        directions.push("Exit through the King Fahd expansion gate".to_string());
        if level_of(MASJID_AL_HARAM).is_congested() {
            directions.push("Follow the covered walkway path to Mina".to_string());
            directions.push("Keep right at the main junction to avoid heavier crowds".to_string());
        } else {
            directions.push("Follow the main path to Mina".to_string());
        }
    }

    directions.push(format!("Arrive at {}", destination));

    if congestion.is_congested() {
        directions
            .push("Stay hydrated and follow crowd management officials' instructions".to_string());
    }

    Ok(RouteResult {
        start: start.to_string(),
        destination: destination.to_string(),
        distance_km,
        duration_minutes: walking_minutes(distance_km, congestion),
        congestion_level: congestion,
        directions,
    })
}
