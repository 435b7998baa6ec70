//! Repositorios en memoria
//!
//! Se usan cuando no hay PostgreSQL (`IN_MEMORY_STORE=true`) y en los tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AlertRepository, DensityRepository, RepositoryError, RepositoryResult};
use crate::models::alert::{NewSafetyAlert, SafetyAlert};
use crate::models::density::DensityReading;

#[derive(Default)]
pub struct InMemoryDensityRepository {
    readings: RwLock<Vec<DensityReading>>,
    offline: AtomicBool,
}

impl InMemoryDensityRepository {
    /// Simula un almacén inalcanzable: toda operación falla mientras esté activo
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> RepositoryResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("in-memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DensityRepository for InMemoryDensityRepository {
    async fn list(&self) -> RepositoryResult<Vec<DensityReading>> {
        self.check_online()?;
        let mut readings = self.readings.read().await.clone();
        // sort_by es estable: los empates conservan el orden de inserción
        readings.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(readings)
    }

    async fn replace_all(&self, readings: &[DensityReading]) -> RepositoryResult<usize> {
        self.check_online()?;
        let mut guard = self.readings.write().await;
        *guard = readings.to_vec();
        Ok(guard.len())
    }

    async fn upsert(&self, reading: DensityReading) -> RepositoryResult<DensityReading> {
        self.check_online()?;
        let mut guard = self.readings.write().await;
        match guard
            .iter_mut()
            .find(|existing| existing.location_name == reading.location_name)
        {
            Some(existing) => *existing = reading.clone(),
            None => guard.push(reading.clone()),
        }
        Ok(reading)
    }
}

#[derive(Default)]
pub struct InMemoryAlertRepository {
    alerts: RwLock<Vec<SafetyAlert>>,
}

#[async_trait]
impl AlertRepository for InMemoryAlertRepository {
    async fn list_active(&self, now: DateTime<Utc>) -> RepositoryResult<Vec<SafetyAlert>> {
        let mut active: Vec<SafetyAlert> = self
            .alerts
            .read()
            .await
            .iter()
            .filter(|alert| alert.is_active(now))
            .cloned()
            .collect();
        active.sort_by(|a, b| b.severity.cmp(&a.severity));
        Ok(active)
    }

    async fn create(
        &self,
        alert: NewSafetyAlert,
        created_at: DateTime<Utc>,
    ) -> RepositoryResult<SafetyAlert> {
        let stored = SafetyAlert {
            id: Uuid::new_v4(),
            title: alert.title,
            description: alert.description,
            location_name: alert.location_name,
            coordinates: alert.coordinates,
            severity: alert.severity,
            created_at,
            expires_at: alert.expires_at,
        };
        self.alerts.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut guard = self.alerts.write().await;
        let before = guard.len();
        guard.retain(|alert| alert.id != id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound(format!("safety alert '{}'", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::alert::AlertSeverity;
    use crate::models::density::{Coordinates, DensityLevel};
    use chrono::Duration;

    fn reading(name: &str, level: DensityLevel, at: DateTime<Utc>) -> DensityReading {
        DensityReading {
            location_name: name.to_string(),
            coordinates: Coordinates { lng: 39.8, lat: 21.4 },
            density_level: level,
            density: None,
            crowd_size: None,
            capacity: None,
            occupancy_percentage: None,
            sections: vec![],
            updated_at: at,
        }
    }

    fn new_alert(title: &str, severity: AlertSeverity, expires_at: DateTime<Utc>) -> NewSafetyAlert {
        NewSafetyAlert {
            title: title.to_string(),
            description: "desc".to_string(),
            location_name: "Mina".to_string(),
            coordinates: Coordinates { lng: 39.89, lat: 21.41 },
            severity,
            expires_at,
        }
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_row_per_location() {
        let repo = InMemoryDensityRepository::default();
        let now = Utc::now();
        repo.upsert(reading("Mina", DensityLevel::Low, now)).await.unwrap();
        repo.upsert(reading("Mina", DensityLevel::High, now)).await.unwrap();
        repo.upsert(reading("Arafat", DensityLevel::Medium, now)).await.unwrap();

        let rows = repo.list().await.unwrap();
        assert_eq!(rows.len(), 2);
        let mina = rows.iter().find(|r| r.location_name == "Mina").unwrap();
        assert_eq!(mina.density_level, DensityLevel::High);
    }

    #[tokio::test]
    async fn test_replace_all_swaps_contents() {
        let repo = InMemoryDensityRepository::default();
        let now = Utc::now();
        repo.upsert(reading("Old", DensityLevel::Low, now)).await.unwrap();

        let count = repo
            .replace_all(&[reading("Mina", DensityLevel::Low, now), reading("Arafat", DensityLevel::Low, now)])
            .await
            .unwrap();

        assert_eq!(count, 2);
        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|r| r.location_name).collect();
        assert_eq!(names, vec!["Mina".to_string(), "Arafat".to_string()]);
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let repo = InMemoryDensityRepository::default();
        repo.set_offline(true);
        assert!(matches!(repo.list().await, Err(RepositoryError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_alerts_filtered_and_ordered_by_severity() {
        let repo = InMemoryAlertRepository::default();
        let now = Utc::now();
        let later = now + Duration::hours(1);
        repo.create(new_alert("medium-1", AlertSeverity::Medium, later), now).await.unwrap();
        repo.create(new_alert("expired", AlertSeverity::Critical, now - Duration::minutes(1)), now).await.unwrap();
        repo.create(new_alert("expires-now", AlertSeverity::Critical, now), now).await.unwrap();
        repo.create(new_alert("high", AlertSeverity::High, later), now).await.unwrap();
        repo.create(new_alert("medium-2", AlertSeverity::Medium, later), now).await.unwrap();

        let titles: Vec<String> = repo.list_active(now).await.unwrap().into_iter().map(|a| a.title).collect();
        assert_eq!(titles, vec!["high", "medium-1", "medium-2"]);
    }

    #[tokio::test]
    async fn test_delete_missing_alert_is_not_found() {
        let repo = InMemoryAlertRepository::default();
        let result = repo.delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }
}
