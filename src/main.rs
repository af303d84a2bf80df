use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rental_marketplace::{
    config::EnvironmentConfig, create_app_router, database::DatabaseConnection, AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging: RUST_LOG, luego LOG_LEVEL, por defecto info
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚗 Rental Marketplace API");
    info!("========================");

    let config = EnvironmentConfig::from_env()?;

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {:#}", e);
            return Err(e);
        }
    };

    db_connection.ping().await?;
    info!("✅ Base de datos disponible");

    if config.run_migrations {
        db_connection.run_migrations().await?;
    }

    let addr = config.server_url();
    let app_state = AppState::with_pool(db_connection.pool().clone(), config);
    let app = create_app_router(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("📋 Reservas:");
    info!("   GET  /api/bookings/admin/all?page=&limit=&status=");
    info!("   GET  /api/bookings/:id");
    info!("   PUT  /api/bookings/:id/status");
    info!("   GET  /api/bookings/:id/history");
    info!("   GET  /api/bookings/client/:clientId?status=");
    info!("   PUT  /api/bookings/:id/cancel");
    info!("   POST /api/bookings/:id/review");
    info!("📊 Reportes:");
    info!("   GET  /api/admin-reports/generate?status=&startDate=&endDate=&format=");
    info!("👥 Usuarios y vehículos:");
    info!("   GET  /auth/admin/all-drivers | /auth/admin/all-vehicles");
    info!("   GET  /auth/client/all | /auth/vehicle-owner/all | /auth/business-owner/all");
    info!("   GET  /api/admin/users");
    info!("   PUT  /api/vehicles/:id/availability");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
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
