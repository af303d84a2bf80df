//! Routers de la API
//! 
//! Cada recurso define su router; `create_app_router` los monta con las
//! capas comunes (trace, CORS, compresión).

pub mod booking_routes;
pub mod report_routes;
pub mod user_routes;
pub mod vehicle_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors_layer;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/bookings", booking_routes::create_booking_router(state.clone()))
        .nest("/api/admin-reports", report_routes::create_report_router(state.clone()))
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router(state.clone()))
        .merge(user_routes::create_user_router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Endpoint de salud simple
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "rental-marketplace",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
