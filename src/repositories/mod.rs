//! Repositorios
//!
//! Acceso a datos detrás de traits, con una implementación PostgreSQL
//! (sqlx) y otra en memoria. `Persistence` agrupa ambos repositorios y la
//! construye el punto de entrada del proceso.

pub mod alert_repository;
pub mod density_repository;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::alert::{NewSafetyAlert, SafetyAlert};
use crate::models::density::DensityReading;

pub use alert_repository::PgAlertRepository;
pub use density_repository::PgDensityRepository;
pub use memory::{InMemoryAlertRepository, InMemoryDensityRepository};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Tabla de lecturas de densidad: una fila por ubicación
#[async_trait]
pub trait DensityRepository: Send + Sync {
    /// Todas las lecturas, la más reciente primero
    async fn list(&self) -> RepositoryResult<Vec<DensityReading>>;

    /// Sustituye el contenido completo de forma atómica
    async fn replace_all(&self, readings: &[DensityReading]) -> RepositoryResult<usize>;

    /// Inserta o reemplaza la lectura de `reading.location_name`
    async fn upsert(&self, reading: DensityReading) -> RepositoryResult<DensityReading>;
}

#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Alertas con `expires_at > now`, por severidad descendente
    async fn list_active(&self, now: DateTime<Utc>) -> RepositoryResult<Vec<SafetyAlert>>;

    async fn create(
        &self,
        alert: NewSafetyAlert,
        created_at: DateTime<Utc>,
    ) -> RepositoryResult<SafetyAlert>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;
}

/// Cliente de persistencia privilegiado
#[derive(Clone)]
pub struct Persistence {
    pub densities: Arc<dyn DensityRepository>,
    pub alerts: Arc<dyn AlertRepository>,
}

impl Persistence {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            densities: Arc::new(PgDensityRepository::new(pool.clone())),
            alerts: Arc::new(PgAlertRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            densities: Arc::new(InMemoryDensityRepository::default()),
            alerts: Arc::new(InMemoryAlertRepository::default()),
        }
    }
}
