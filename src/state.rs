//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. El cliente de persistencia lo construye
//! el punto de entrada y llega aquí ya creado.

use chrono::Duration;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::environment::AppConfig;
use crate::repositories::Persistence;
use crate::services::density_model::DensityModel;
use crate::services::density_poller::SharedSnapshot;
use crate::services::density_service::DensityService;
use crate::services::route_service::RouteService;
use crate::utils::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    persistence: Option<Persistence>,
    pub densities: DensityService,
    pub routes: RouteService,
    pub snapshot: SharedSnapshot,
}

impl AppState {
    pub fn new(config: AppConfig, persistence: Option<Persistence>) -> Self {
        let model = DensityModel::new(config.site_offset, config.forced_variety);
        let staleness = Duration::from_std(config.staleness).unwrap_or_else(|_| Duration::minutes(5));
        let densities = DensityService::new(
            model,
            persistence.as_ref().map(|p| p.densities.clone()),
            staleness,
        );
        let routes = RouteService::new(densities.clone());

        Self {
            config,
            persistence,
            densities,
            routes,
            snapshot: Arc::new(RwLock::new(None)),
        }
    }

    /// Cliente privilegiado; sin él los endpoints responden 500
    pub fn persistence(&self) -> AppResult<&Persistence> {
        self.persistence.as_ref().ok_or(AppError::Configuration)
    }

    pub fn has_persistence(&self) -> bool {
        self.persistence.is_some()
    }
}
