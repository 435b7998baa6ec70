//! Refresco periódico de densidades
//!
//! Tarea programada con arranque y parada explícitos: en cada tick pide
//! las lecturas vigentes (lo que recalcula la tabla cuando caduca) y
//! publica un resumen en una celda compartida.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::models::density::{DensityLevel, DensityReading};
use crate::services::density_service::DensityService;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DensitySnapshot {
    pub refreshed_at: DateTime<Utc>,
    pub locations: usize,
    pub levels: BTreeMap<DensityLevel, usize>,
}

impl DensitySnapshot {
    pub fn from_readings(readings: &[DensityReading], refreshed_at: DateTime<Utc>) -> Self {
        let mut levels: BTreeMap<DensityLevel, usize> =
            DensityLevel::ALL.iter().map(|level| (*level, 0)).collect();
        for reading in readings {
            *levels.entry(reading.density_level).or_default() += 1;
        }
        Self {
            refreshed_at,
            locations: readings.len(),
            levels,
        }
    }
}

pub type SharedSnapshot = Arc<RwLock<Option<DensitySnapshot>>>;

pub struct DensityPoller {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl DensityPoller {
    /// Arranca la tarea; el primer tick es inmediato
    pub fn start(service: DensityService, every: Duration, snapshot: SharedSnapshot) -> Self {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!("⏱️ Refresco de densidades cada {:?}", every);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let now = Utc::now();
                        let readings = service.current(now, false).await;
                        debug!("🔄 Refresco periódico: {} lecturas", readings.len());
                        *snapshot.write().await = Some(DensitySnapshot::from_readings(&readings, now));
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("🛑 Refresco de densidades detenido");
        });

        Self { stop_tx, handle }
    }

    /// Detiene la tarea y espera a que termine
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.handle.await {
            warn!("⚠️ La tarea de refresco terminó con error: {}", e);
        }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}
