//! Configuración de variables de entorno
//!
//! Este módulo lee la configuración del proceso. Los valores mal formados
//! son un `ConfigError`; las variables ausentes toman su valor por defecto.

use chrono::FixedOffset;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use super::database::DatabaseConfig;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("SITE_UTC_OFFSET_HOURS out of range: {0}")]
    OffsetOutOfRange(i32),
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// URL de PostgreSQL: es el cliente de persistencia privilegiado
    pub database: Option<DatabaseConfig>,
    pub in_memory_store: bool,
    pub cors_origins: Vec<String>,
    pub site_offset: FixedOffset,
    pub staleness: Duration,
    pub refresh_interval: Duration,
    pub forced_variety: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database: None,
            in_memory_store: false,
            cors_origins: Vec::new(),
            site_offset: FixedOffset::east_opt(3 * 3600).expect("UTC+3 is a valid offset"),
            staleness: Duration::from_secs(300),
            refresh_interval: Duration::from_secs(30),
            forced_variety: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Construye la configuración a partir de cualquier fuente clave/valor
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let offset_hours: i32 = parse_or(get("SITE_UTC_OFFSET_HOURS"), "SITE_UTC_OFFSET_HOURS", 3)?;
        let site_offset = FixedOffset::east_opt(offset_hours * 3600)
            .ok_or(ConfigError::OffsetOutOfRange(offset_hours))?;

        let database = match get("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 10)?,
                ..DatabaseConfig::default()
            }),
            None => None,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or(get("PORT"), "PORT", defaults.port)?,
            database,
            in_memory_store: parse_or(get("IN_MEMORY_STORE"), "IN_MEMORY_STORE", false)?,
            cors_origins: get("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            site_offset,
            staleness: parse_period(
                get("DENSITY_STALENESS_SECS"),
                "DENSITY_STALENESS_SECS",
                defaults.staleness,
            )?,
            refresh_interval: parse_period(
                get("DENSITY_REFRESH_SECS"),
                "DENSITY_REFRESH_SECS",
                defaults.refresh_interval,
            )?,
            forced_variety: parse_or(get("DEMO_FORCED_VARIETY"), "DEMO_FORCED_VARIETY", true)?,
        })
    }

    /// Obtener la dirección del servidor
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

/// Segundos estrictamente positivos
fn parse_period(
    value: Option<String>,
    name: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match parse_or(value, name, default.as_secs())? {
        0 => Err(ConfigError::Invalid { name, value: "0".to_string() }),
        secs => Ok(Duration::from_secs(secs)),
    }
}
