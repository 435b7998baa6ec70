use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use dotenvy::dotenv;

use crowd_monitor::build_router;
use crowd_monitor::config::AppConfig;
use crowd_monitor::database::DatabaseConnection;
use crowd_monitor::repositories::Persistence;
use crowd_monitor::services::density_poller::DensityPoller;
use crowd_monitor::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🕋 Crowd Monitor - Panel de densidad para lugares de peregrinación");
    info!("==================================================================");

    let config = AppConfig::from_env()?;
    let persistence = build_persistence(&config).await?;

    let app_state = AppState::new(config.clone(), persistence);
    let poller = DensityPoller::start(
        app_state.densities.clone(),
        config.refresh_interval,
        app_state.snapshot.clone(),
    );

    let app = build_router(app_state);
    let addr: SocketAddr = config.server_addr().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /health - Estado del servicio");
    info!("   GET    /api/crowd-density - Lecturas de densidad (?force=true)");
    info!("   POST   /api/crowd-density - Recalcular o registrar una lectura");
    info!("   GET    /api/routes - Ruta entre dos ubicaciones");
    info!("   GET    /api/safety-alerts - Alertas activas");
    info!("   POST   /api/safety-alerts - Crear alerta");
    info!("   DELETE /api/safety-alerts?id= - Eliminar alerta");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if !poller.is_running() {
        warn!("⚠️ El refresco de densidades se detuvo antes del apagado");
    }
    poller.stop().await;

    if let Err(e) = served {
        error!("❌ Servidor terminó con error: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Elige el cliente de persistencia: PostgreSQL, memoria o ninguno
async fn build_persistence(config: &AppConfig) -> Result<Option<Persistence>> {
    if let Some(database) = &config.database {
        let connection = match DatabaseConnection::new(database) {
            Ok(conn) => conn,
            Err(e) => {
                error!("❌ Error conectando a la base de datos: {}", e);
                return Err(anyhow::anyhow!("Error de base de datos: {}", e));
            }
        };
        connection.run_migrations().await;
        return Ok(Some(Persistence::postgres(connection.pool().clone())));
    }

    if config.in_memory_store {
        info!("🧠 Usando almacenamiento en memoria");
        return Ok(Some(Persistence::in_memory()));
    }

    warn!("⚠️ DATABASE_URL no definida: los endpoints de datos responderán 500");
    Ok(None)
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el manejador de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el manejador de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
