//! Servicio de densidad
//!
//! Adaptador entre el simulador y la tabla de lecturas: sirve lecturas
//! almacenadas mientras estén frescas, recalcula cuando caducan y cae al
//! cálculo directo (sin persistir) cuando el almacén no responde.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::density::DensityReading;
use crate::repositories::{DensityRepository, RepositoryResult};
use crate::services::density_model::DensityModel;

#[derive(Clone)]
pub struct DensityService {
    model: Arc<DensityModel>,
    store: Option<Arc<dyn DensityRepository>>,
    staleness: Duration,
}

impl DensityService {
    pub fn new(
        model: DensityModel,
        store: Option<Arc<dyn DensityRepository>>,
        staleness: Duration,
    ) -> Self {
        Self {
            model: Arc::new(model),
            store,
            staleness,
        }
    }

    /// Lecturas calculadas al vuelo, sin tocar el almacén
    pub fn compute(&self, now: DateTime<Utc>) -> Vec<DensityReading> {
        self.model.compute_densities(now, &mut rand::thread_rng())
    }

    /// Lecturas vigentes. Nunca falla: cualquier problema con el almacén
    /// acaba en el cálculo directo.
    pub async fn current(&self, now: DateTime<Utc>, force: bool) -> Vec<DensityReading> {
        let Some(store) = &self.store else {
            return self.compute(now);
        };

        if !force {
            match store.list().await {
                Ok(readings) if self.is_fresh(&readings, now) => {
                    info!("✅ Usando lecturas recientes del almacén");
                    return readings;
                }
                Ok(_) => info!("🔄 Lecturas ausentes o caducadas, recalculando"),
                Err(e) => {
                    warn!("⚠️ Almacén inalcanzable, cálculo directo: {}", e);
                    return self.compute(now);
                }
            }
        }

        if let Err(e) = self.force_recompute(now).await {
            warn!("⚠️ Fallo al recalcular densidades, cálculo directo: {}", e);
            return self.compute(now);
        }

        match store.list().await {
            Ok(readings) => readings,
            Err(e) => {
                warn!("⚠️ Fallo al releer densidades, cálculo directo: {}", e);
                self.compute(now)
            }
        }
    }

    /// Recalcula todas las ubicaciones y sustituye la tabla completa.
    /// Sin almacén configurado solo calcula y devuelve el número de lecturas.
    pub async fn force_recompute(&self, now: DateTime<Utc>) -> RepositoryResult<usize> {
        let readings = self.compute(now);
        let Some(store) = &self.store else {
            return Ok(readings.len());
        };

        let count = store.replace_all(&readings).await?;
        info!("💾 {} lecturas de densidad almacenadas", count);
        Ok(count)
    }

    /// Inserta o sustituye la lectura de una ubicación (entrada manual)
    pub async fn upsert(&self, reading: DensityReading) -> RepositoryResult<DensityReading> {
        match &self.store {
            Some(store) => store.upsert(reading).await,
            None => Ok(reading),
        }
    }

    fn is_fresh(&self, readings: &[DensityReading], now: DateTime<Utc>) -> bool {
        readings
            .iter()
            .map(|reading| reading.updated_at)
            .max()
            .is_some_and(|freshest| freshest > now - self.staleness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::density::{Coordinates, DensityLevel};
    use crate::models::location::LOCATIONS;
    use crate::repositories::InMemoryDensityRepository;
    use chrono::FixedOffset;

    fn service(store: Arc<InMemoryDensityRepository>) -> DensityService {
        DensityService::new(
            DensityModel::new(FixedOffset::east_opt(3 * 3600).unwrap(), true),
            Some(store),
            Duration::minutes(5),
        )
    }

    fn manual(name: &str, at: DateTime<Utc>) -> DensityReading {
        DensityReading {
            location_name: name.to_string(),
            coordinates: Coordinates { lng: 39.9, lat: 21.4 },
            density_level: DensityLevel::Critical,
            density: None,
            crowd_size: Some(10),
            capacity: None,
            occupancy_percentage: None,
            sections: vec![],
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_empty_store_triggers_recompute() {
        let store = Arc::new(InMemoryDensityRepository::default());
        let service = service(store.clone());
        let now = Utc::now();

        let readings = service.current(now, false).await;

        assert_eq!(readings.len(), LOCATIONS.len());
        assert_eq!(store.list().await.unwrap().len(), LOCATIONS.len());
    }

    #[tokio::test]
    async fn test_fresh_data_is_served_as_is() {
        let store = Arc::new(InMemoryDensityRepository::default());
        let service = service(store.clone());
        let now = Utc::now();
        store.upsert(manual("Mina", now - Duration::minutes(4))).await.unwrap();

        let readings = service.current(now, false).await;

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].location_name, "Mina");
    }

    #[tokio::test]
    async fn test_stale_data_is_replaced() {
        let store = Arc::new(InMemoryDensityRepository::default());
        let service = service(store.clone());
        let now = Utc::now();
        store.upsert(manual("Mina", now - Duration::minutes(6))).await.unwrap();

        let readings = service.current(now, false).await;

        assert_eq!(readings.len(), LOCATIONS.len());
        assert!(readings.iter().all(|r| r.updated_at == now));
    }

    #[tokio::test]
    async fn test_reading_exactly_at_window_edge_is_stale() {
        let store = Arc::new(InMemoryDensityRepository::default());
        let service = service(store.clone());
        let now = Utc::now();
        store.upsert(manual("Mina", now - Duration::minutes(5))).await.unwrap();

        let readings = service.current(now, false).await;

        assert_eq!(readings.len(), LOCATIONS.len());
        assert!(readings.iter().all(|r| r.updated_at == now));
    }

    #[tokio::test]
    async fn test_force_skips_freshness_check() {
        let store = Arc::new(InMemoryDensityRepository::default());
        let service = service(store.clone());
        let now = Utc::now();
        store.upsert(manual("Mina", now)).await.unwrap();

        let readings = service.current(now, true).await;

        assert_eq!(readings.len(), LOCATIONS.len());
    }

    #[tokio::test]
    async fn test_unreachable_store_falls_back_to_direct_computation() {
        let store = Arc::new(InMemoryDensityRepository::default());
        let service = service(store.clone());
        store.set_offline(true);

        let readings = service.current(Utc::now(), false).await;
        assert_eq!(readings.len(), LOCATIONS.len());

        assert!(service.force_recompute(Utc::now()).await.is_err());
    }

    #[tokio::test]
    async fn test_without_store_everything_is_computed() {
        let service = DensityService::new(
            DensityModel::new(FixedOffset::east_opt(0).unwrap(), false),
            None,
            Duration::minutes(5),
        );
        assert_eq!(service.current(Utc::now(), false).await.len(), LOCATIONS.len());
        assert_eq!(service.force_recompute(Utc::now()).await.unwrap(), LOCATIONS.len());
    }
}
