//! Configuración de conexión a PostgreSQL
//!
//! Este módulo crea el pool y aplica las migraciones del esquema.

use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::database::DatabaseConfig;

#[derive(Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    pub fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        info!("🔗 Preparando pool de PostgreSQL: {}", mask_database_url(&config.url));
        let pool = config.create_lazy_pool()?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Ejecutar migraciones de la base de datos. Un fallo no es fatal:
    /// las lecturas caen al cálculo directo mientras la base no responda.
    pub async fn run_migrations(&self) -> bool {
        match sqlx::migrate!("./migrations").run(&self.pool).await {
            Ok(()) => {
                info!("✅ Migraciones aplicadas");
                true
            }
            Err(e) => {
                warn!("⚠️ No se pudieron aplicar las migraciones: {}", e);
                false
            }
        }
    }
}

/// Función helper para enmascarar la URL de la base de datos en logs
fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.find('@') else {
        return url.to_string();
    };
    let scheme_end = url.find("://").map(|pos| pos + 3).unwrap_or(0);
    if scheme_end > at_pos {
        return url.to_string();
    }
    format!("{}***:***@{}", &url[..scheme_end], &url[at_pos + 1..])
}
