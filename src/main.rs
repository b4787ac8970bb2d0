use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use fleet_inspections::config::environment::EnvironmentConfig;
use fleet_inspections::database::connection::{create_pool, run_migrations};
use fleet_inspections::routes::create_app_router;
use fleet_inspections::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("🚛 Fleet Inspections - API de programaciones de inspección");
    info!("==========================================================");

    // Inicializar base de datos
    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(e);
        }
    };
    run_migrations(&pool).await?;

    let config = EnvironmentConfig::default();
    let addr: SocketAddr = config.server_addr().parse()?;

    let app = create_app_router(AppState::new(pool, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Liveness");
    info!("   GET  /api/inspection-schedules - Obligaciones expandidas (ventana -30d/+7d)");
    info!("   POST /api/inspection-schedules - Lote IGNORE/RESTORE");
    info!("   GET  /api/inspection-schedules/rules - Listar programaciones");
    info!("   POST /api/inspection-schedules/rules - Crear programación");
    info!("   PUT  /api/inspection-schedules/rules/:id - Editar programación");
    info!("   GET  /api/vehicles - Flota activa");
    info!("   GET  /api/inspection-templates - Plantillas de inspección");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
