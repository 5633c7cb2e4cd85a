//! Rutas HTTP

pub mod garage_routes;
pub mod weather_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_for;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    let cors = cors_for(&state.config);

    Router::new()
        .route("/test", get(test_endpoint))
        .nest("/api/garage", garage_routes::create_garage_router())
        .nest("/api", weather_routes::create_weather_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Garagem Virtual funcionando corretamente!",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
