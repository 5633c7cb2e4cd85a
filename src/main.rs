use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};
use dotenvy::dotenv;

use garagem_virtual::config::environment::EnvironmentConfig;
use garagem_virtual::routes::create_app_router;
use garagem_virtual::services::{GarageService, WeatherService};
use garagem_virtual::state::AppState;
use garagem_virtual::storage;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    let max_level = if config.is_production() {
        tracing::Level::INFO
    } else {
        tracing::Level::DEBUG
    };
    tracing_subscriber::fmt().with_max_level(max_level).init();

    info!("🚗 Garagem Virtual - API");
    info!("================================================");
    info!("⚙️ Ambiente: {}", config.environment);

    // Inicializar persistencia
    let store = match storage::connect(&config.storage).await {
        Ok(store) => store,
        Err(e) => {
            error!("❌ Error inicializando la persistencia: {}", e);
            return Err(anyhow::anyhow!("Error de persistencia: {}", e));
        }
    };

    let garage = GarageService::load(store, &config.storage.key).await;
    for warning in &garage.status().load_warnings {
        warn!("⚠️ {}", warning);
    }
    info!("✅ Garagem pronta com {} veículos", garage.garage().len());

    let weather = WeatherService::new(&config.weather)?;
    if config.weather.api_key.is_none() {
        warn!("⚠️ OPENWEATHER_API_KEY ausente: /api/previsao responderá 500");
    }

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app_router(AppState::new(config, garage, weather));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("🚗 Endpoints - Garagem:");
    info!("   GET  /api/garage/status - Estado de carga y persistencia");
    info!("   GET  /api/garage/vehicles - Listar vehículos");
    info!("   POST /api/garage/vehicles - Agregar vehículo");
    info!("   GET  /api/garage/vehicles/:key - Obtener vehículo");
    info!("   DELETE /api/garage/vehicles/:key - Eliminar vehículo");
    info!("   POST /api/garage/vehicles/:key/actions - Ejecutar acción");
    info!("🔧 Endpoints - Manutenção:");
    info!("   GET  /api/garage/vehicles/:key/maintenance - Historial y agenda");
    info!("   POST /api/garage/vehicles/:key/maintenance - Registrar manutenção");
    info!("   DELETE /api/garage/vehicles/:key/maintenance/:id - Eliminar registro");
    info!("🌦️ Endpoints - Clima:");
    info!("   GET  /api/previsao/:cidade - Previsión de 5 días");

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
